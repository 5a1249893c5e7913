use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Columns every stored record carries. Entities embed it with
/// `#[serde(flatten)]` so the wire shape stays flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct BaseRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
