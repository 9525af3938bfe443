//! Customer accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use happy_store_core::{Email, UserId};

/// A registered customer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}
