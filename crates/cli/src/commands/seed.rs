//! Catalog seeding.
//!
//! Products go through the same validation as the admin console's add form,
//! so a seeded catalog never holds anything the admin could not have added.
//!
//! The file format is a JSON array of add-product bodies:
//!
//! ```json
//! [{ "name": "Linen Shirt", "price": "650", "category": "Men",
//!    "sub_category": "Topwear", "sizes": ["M", "L"], "bestseller": true }]
//! ```

use std::path::Path;

use tracing::{error, info};

use happy_store_admin::db;
use happy_store_admin::models::{NewProduct, ProductForm};
use happy_store_core::{Category, Money, Size, SubCategory};

use super::migrate::database_url;

/// Insert products from `file`, or the demo catalog when no file is given.
///
/// Every product is validated before anything is written, and all inserts
/// share one transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any product is
/// invalid, or the database rejects an insert.
pub async fn products(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let forms = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            let content = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<Vec<ProductForm>>(&content)?
        }
        None => demo_catalog(),
    };

    let products = validate_all(forms)?;

    let pool = db::create_pool(&database_url()?).await?;
    let mut tx = pool.begin().await?;
    for product in &products {
        let created = db::products::insert(&mut tx, product).await?;
        info!(id = %created.id, name = %created.name, "Inserted product");
    }
    tx.commit().await?;

    info!(count = products.len(), "Seeding complete!");
    Ok(())
}

/// Validate every form, logging each rejection. Fails if any is invalid.
fn validate_all(forms: Vec<ProductForm>) -> Result<Vec<NewProduct>, String> {
    let mut products = Vec::with_capacity(forms.len());
    let mut invalid = 0usize;
    for (index, form) in forms.into_iter().enumerate() {
        let name = form.name.clone();
        match form.validate() {
            Ok(product) => products.push(product),
            Err(e) => {
                error!(index, name = %name, "Invalid product: {e}");
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        return Err(format!("{invalid} invalid products, nothing inserted"));
    }
    Ok(products)
}

fn demo_product(
    name: &str,
    price: i64,
    category: Category,
    sub_category: SubCategory,
    sizes: &[Size],
    bestseller: bool,
) -> ProductForm {
    let slug = name.to_lowercase().replace(' ', "-");
    ProductForm {
        name: name.to_owned(),
        description: format!("{name} from the Happy Store demo collection."),
        price: Money::from_major(price),
        images: vec![format!("https://images.happystore.test/{slug}.jpg")],
        category,
        sub_category,
        sizes: sizes.to_vec(),
        bestseller,
    }
}

/// A small catalog covering every category and sub-category.
fn demo_catalog() -> Vec<ProductForm> {
    use Category::{Kids, Men, Women};
    use Size::{L, M, S, XL, XXL};
    use SubCategory::{Bottomwear, Topwear, Winterwear};

    vec![
        demo_product("Cotton Crew Tee", 400, Women, Topwear, &[S, M, L], true),
        demo_product("Silk Wrap Blouse", 1200, Women, Topwear, &[S, M], false),
        demo_product("High Rise Jeans", 1500, Women, Bottomwear, &[S, M, L, XL], true),
        demo_product("Quilted Puffer", 3200, Women, Winterwear, &[M, L], false),
        demo_product("Linen Shirt", 650, Men, Topwear, &[M, L, XL], true),
        demo_product("Chino Trousers", 1100, Men, Bottomwear, &[M, L, XL, XXL], false),
        demo_product("Wool Overcoat", 4800, Men, Winterwear, &[L, XL], true),
        demo_product("Graphic Tee", 300, Kids, Topwear, &[S, M], true),
        demo_product("Jogger Pants", 450, Kids, Bottomwear, &[S, M, L], false),
        demo_product("Fleece Hoodie", 700, Kids, Winterwear, &[S, M], false),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_passes_admin_validation() {
        let catalog = demo_catalog();
        assert!(!catalog.is_empty());
        for form in catalog {
            assert!(form.clone().validate().is_ok(), "{}", form.name);
        }
    }

    #[test]
    fn test_demo_catalog_covers_every_category() {
        let catalog = demo_catalog();
        for category in Category::ALL {
            for sub in SubCategory::ALL {
                assert!(
                    catalog
                        .iter()
                        .any(|p| p.category == *category && p.sub_category == *sub),
                    "{category:?}/{sub:?}"
                );
            }
        }
    }

    #[test]
    fn test_one_invalid_product_rejects_the_whole_batch() {
        let mut forms = demo_catalog();
        let total = forms.len();
        forms[1].price = Money::ZERO;
        forms[2].sizes.clear();

        let err = validate_all(forms).unwrap_err();
        assert_eq!(err, "2 invalid products, nothing inserted");

        assert_eq!(validate_all(demo_catalog()).unwrap().len(), total);
    }
}
