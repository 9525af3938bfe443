//! Product reviews and rating aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, UserId};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MAX_REVIEW_IMAGES: usize = 5;

/// Reviewer identity shown next to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub author: ReviewAuthor,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A review as submitted by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between {MIN_RATING} and {MAX_RATING}")]
    RatingOutOfRange(u8),
    #[error("comment is required")]
    EmptyComment,
    #[error("Maximum {MAX_REVIEW_IMAGES} images allowed")]
    TooManyImages(usize),
}

impl NewReview {
    /// Check the rating range, comment and image count, and trim the comment.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReviewError`] found.
    pub fn validate(mut self) -> Result<Self, ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        let trimmed = self.comment.trim();
        if trimmed.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        if self.images.len() > MAX_REVIEW_IMAGES {
            return Err(ReviewError::TooManyImages(self.images.len()));
        }
        self.comment = trimmed.to_owned();
        Ok(self)
    }
}

/// Count and share of reviews at one star level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingBucket {
    pub star: u8,
    pub count: usize,
    pub percentage: f64,
}

/// Average rating and per-star distribution for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating rounded to one decimal place; zero without reviews.
    pub average: Decimal,
    /// Buckets for 5 stars down to 1 star.
    pub distribution: Vec<RatingBucket>,
}

impl ReviewSummary {
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let count = reviews.len();
        let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();

        let average = if count == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(sum) / Decimal::from(count as u64))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        };

        let distribution = (MIN_RATING..=MAX_RATING)
            .rev()
            .map(|star| {
                let at_star = reviews.iter().filter(|r| r.rating == star).count();
                #[allow(clippy::cast_precision_loss)] // review counts are far below 2^52
                let percentage = if count == 0 {
                    0.0
                } else {
                    at_star as f64 / count as f64 * 100.0
                };
                RatingBucket {
                    star,
                    count: at_star,
                    percentage,
                }
            })
            .collect();

        Self {
            count,
            average,
            distribution,
        }
    }
}

/// Reviews with exactly `rating` stars, or all of them for `None`.
#[must_use]
pub fn filter_by_rating(reviews: &[Review], rating: Option<u8>) -> Vec<&Review> {
    reviews
        .iter()
        .filter(|r| rating.is_none_or(|star| r.rating == star))
        .collect()
}

/// Sort newest first, the order reviews are listed in.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Word shown for a star rating in the review form.
#[must_use]
pub const fn rating_label(rating: u8) -> &'static str {
    match rating {
        1 => "Poor",
        2 => "Fair",
        3 => "Good",
        4 => "Very Good",
        5 => "Excellent",
        _ => "",
    }
}
