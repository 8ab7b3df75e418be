//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};

// ********************* ENUMERAZIONI UTILI **********************//

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "dealer_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealerRole {
    Admin,
    Dealer,
    Manager,
}

impl Default for DealerRole {
    fn default() -> Self {
        DealerRole::Dealer
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "dealer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealerStatus {
    Active,
    Inactive,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "file_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Approved,
    Rejected,
}
