use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShortUrl {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Owning namespace id.
    pub namespace: i64,
    #[serde(default)]
    pub namespace_name: String,
    pub created_by: i64,
    #[serde(default)]
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub click_count: i64,
}
