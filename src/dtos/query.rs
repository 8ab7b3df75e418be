//! Query DTOs - Data Transfer Objects per query string

use serde::{Deserialize, Serialize};

/// Query parameters della lista dealer: /dealers?search=...&include_inactive=true
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DealerListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: Option<bool>,
}
