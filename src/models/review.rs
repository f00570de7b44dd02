//! Customer reviews attached to completed bookings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub rating: f32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comment_date: Option<String>,
}
