use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping of short URLs within one organization. Names are
/// unique per organization (server-enforced).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Namespace {
    pub id: i64,
    pub name: String,
    /// Owning organization id.
    pub organization: i64,
    #[serde(default)]
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
