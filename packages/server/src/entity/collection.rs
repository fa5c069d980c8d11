use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted ownership record for one catalog entry.
///
/// The composite primary key mirrors the catalog identity. Rows are
/// created on first status change (or catalog sync), updated in place,
/// never deleted. A row may outlive its catalog entry; such orphans are
/// simply excluded from joined views.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Empty string when the card has no collector number. Never NULL:
    /// a nullable key column would break primary-key uniqueness.
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,

    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
