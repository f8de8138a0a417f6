// ── Customers and back-office records ──
//
// Flat records. Nothing here carries lifecycle rules.

use serde::{Deserialize, Serialize};

use super::id::RecordId;

/// A parking customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub full_name: Option<String>,
    /// National ID card number.
    pub cccd: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub employee_code: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: RecordId,
    pub full_name: Option<String>,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
}

/// Login account for console operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    pub username: String,
    pub role_id: Option<RecordId>,
    pub status: Option<String>,
}
