use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::collection::CardRef;
use crate::entity::collection;

/// Result of one catalog sync run.
pub struct SyncOutcome {
    pub parsed: usize,
    pub upserts: usize,
    pub row_count: u64,
}

/// Upsert every catalog row into the ownership store.
///
/// New keys get a row with all flags false; existing rows only have
/// `updated_at` refreshed — ownership flags are never touched by a sync.
pub async fn sync_catalog(
    db: &DatabaseConnection,
    refs: &[CardRef],
) -> Result<SyncOutcome, DbErr> {
    let mut upserts = 0usize;
    for r in refs {
        let key = r.key();
        let model = collection::ActiveModel {
            name: Set(key.name),
            number: Set(key.number),
            owned: Set(false),
            duplicate: Set(false),
            foil: Set(false),
            updated_at: Set(chrono::Utc::now()),
        };

        collection::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([collection::Column::Name, collection::Column::Number])
                    .update_column(collection::Column::UpdatedAt)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        upserts += 1;
    }

    let row_count = collection::Entity::find().count(db).await?;
    info!(parsed = refs.len(), upserts, row_count, "catalog sync complete");

    Ok(SyncOutcome {
        parsed: refs.len(),
        upserts,
        row_count,
    })
}
