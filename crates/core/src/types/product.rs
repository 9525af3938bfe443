//! Product classification: sizes, categories and sub-categories.
//!
//! All three serialize as their display labels (`"XL"`, `"Women"`,
//! `"Winterwear"`) because those labels are what clients send and what the
//! database stores.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A label that does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| ParseError::new($kind, trimmed))
            }
        }
    };
}

labelled_enum! {
    /// Garment size. Ordered smallest to largest.
    Size, "size" {
        S => "S",
        M => "M",
        L => "L",
        XL => "XL",
        XXL => "XXL",
    }
}

labelled_enum! {
    /// Top-level catalog section.
    Category, "category" {
        Men => "Men",
        Women => "Women",
        Kids => "Kids",
    }
}

labelled_enum! {
    /// Garment type within a category.
    SubCategory, "sub-category" {
        Topwear => "Topwear",
        Bottomwear => "Bottomwear",
        Winterwear => "Winterwear",
    }
}

/// Parse a comma-separated list of labels, ignoring empty segments.
///
/// Used for query strings like `?category=Men,Women`.
///
/// # Errors
///
/// Returns the first segment that is not a valid label.
pub fn parse_list<T: FromStr<Err = ParseError>>(raw: &str) -> Result<Vec<T>, ParseError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_case_insensitively() {
        assert_eq!("xl".parse::<Size>().unwrap(), Size::XL);
        assert_eq!("WOMEN".parse::<Category>().unwrap(), Category::Women);
        assert_eq!(
            " winterwear ".parse::<SubCategory>().unwrap(),
            SubCategory::Winterwear
        );
    }

    #[test]
    fn test_unknown_label() {
        let err = "XS".parse::<Size>().unwrap_err();
        assert_eq!(err.kind, "size");
        assert_eq!(err.to_string(), "unknown size: XS");
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Size::XXL).unwrap(), r#""XXL""#);
        let cat: Category = serde_json::from_str(r#""Kids""#).unwrap();
        assert_eq!(cat, Category::Kids);
    }

    #[test]
    fn test_parse_list() {
        let cats: Vec<Category> = parse_list("Men, ,Women").unwrap();
        assert_eq!(cats, vec![Category::Men, Category::Women]);
        assert!(parse_list::<Category>("Men,Aliens").is_err());
        assert!(parse_list::<Category>("").unwrap().is_empty());
    }

    #[test]
    fn test_size_order() {
        assert!(Size::S < Size::M && Size::XL < Size::XXL);
    }
}
