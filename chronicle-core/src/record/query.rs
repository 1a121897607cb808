use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filter options for reading an entity's audit trail.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Exact-match action filter.
    pub action: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub from_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Sort on `created_at`; newest first by default.
    pub sort: SortOrder,
}
