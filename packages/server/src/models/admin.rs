use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::seed::SyncOutcome;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Store health probe.
#[derive(Serialize, ToSchema)]
pub struct PingResponse {
    pub ok: bool,
    /// Store-side clock, proving a live round trip.
    pub now: String,
    /// Rows currently in the ownership table.
    pub rows: u64,
    /// Connection URL with credentials masked.
    pub connection: String,
}

/// Catalog-vs-store integrity report.
#[derive(Serialize, ToSchema)]
pub struct VerifyResponse {
    pub ok: bool,
    pub counts: VerifyCounts,
    /// Expected ownership-table columns absent from the live schema.
    pub missing_columns: Vec<String>,
    /// Names of catalog entries with no store row (first 50).
    pub missing_names: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyCounts {
    /// Entries parsed from the catalog.
    pub list: usize,
    /// Rows in the ownership table.
    pub db: usize,
    /// Catalog entries the store has no row for.
    pub missing: usize,
}

#[derive(Serialize, ToSchema)]
pub struct SyncResponse {
    /// Catalog rows parsed from the reference list.
    pub parsed: usize,
    /// Rows written to the store (insert or refresh).
    pub upserts: usize,
    /// Total rows in the store after the sync.
    pub row_count: u64,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(o: SyncOutcome) -> Self {
        Self {
            parsed: o.parsed,
            upserts: o.upserts,
            row_count: o.row_count,
        }
    }
}
