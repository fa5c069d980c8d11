use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::collection;
use crate::error::AppError;

use super::{CardKey, OwnershipStatus, store};

/// Partial status update: absent fields keep their current value.
#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema)]
pub struct StatusPatch {
    pub owned: Option<bool>,
    pub duplicate: Option<bool>,
    pub foil: Option<bool>,
}

/// Merge a patch over the current status and re-derive the invariant.
///
/// If the merged `duplicate` is true, `owned` is forced to true no
/// matter what the patch asked for `owned` in the same call. The state
/// `duplicate=true, owned=false` can never leave this function; foil and
/// owned are otherwise independent.
pub fn apply_patch(current: OwnershipStatus, patch: StatusPatch) -> OwnershipStatus {
    let mut next = OwnershipStatus {
        owned: patch.owned.unwrap_or(current.owned),
        duplicate: patch.duplicate.unwrap_or(current.duplicate),
        foil: patch.foil.unwrap_or(current.foil),
    };
    if next.duplicate {
        next.owned = true;
    }
    next
}

/// Validate, merge and persist one status update.
///
/// Rejects a blank `name` before touching the store. Reads the current
/// record (defaults for a brand-new key), merges the patch, and persists
/// the full merged record in a single upsert: either the whole record
/// lands or nothing does.
pub async fn set_status(
    db: &DatabaseConnection,
    name: &str,
    number: Option<&str>,
    patch: StatusPatch,
) -> Result<collection::Model, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let key = CardKey::new(name, number);
    let current = store::fetch(db, &key)
        .await?
        .as_ref()
        .map(OwnershipStatus::from)
        .unwrap_or_default();
    let next = apply_patch(current, patch);

    Ok(store::upsert(db, &key, next).await?)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, MockDatabase, MockExecResult};

    use super::*;

    fn status(owned: bool, duplicate: bool, foil: bool) -> OwnershipStatus {
        OwnershipStatus {
            owned,
            duplicate,
            foil,
        }
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let current = status(true, false, true);
        let next = apply_patch(
            current,
            StatusPatch {
                duplicate: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(next, current);
    }

    #[test]
    fn duplicate_forces_owned() {
        let next = apply_patch(
            OwnershipStatus::default(),
            StatusPatch {
                duplicate: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(next, status(true, true, false));
    }

    #[test]
    fn duplicate_overrides_owned_false_in_same_patch() {
        let next = apply_patch(
            status(true, true, false),
            StatusPatch {
                owned: Some(false),
                ..Default::default()
            },
        );
        // duplicate is still true, so the requested owned=false loses.
        assert_eq!(next, status(true, true, false));
    }

    #[test]
    fn clearing_duplicate_releases_owned() {
        let next = apply_patch(
            status(true, true, false),
            StatusPatch {
                owned: Some(false),
                duplicate: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(next, status(false, false, false));
    }

    #[test]
    fn patch_application_is_idempotent() {
        let patch = StatusPatch {
            foil: Some(true),
            duplicate: Some(true),
            ..Default::default()
        };
        let once = apply_patch(OwnershipStatus::default(), patch);
        let twice = apply_patch(once, patch);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_store_access() {
        // No query or exec results registered: any store access would fail.
        let db = MockDatabase::new(DbBackend::Postgres).into_connection();
        let err = set_status(&db, "   ", None, StatusPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_on_empty_store_persists_owned() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([Vec::<collection::Model>::new()])
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                ..Default::default()
            }])
            .into_connection();

        let saved = set_status(
            &db,
            "Jinx",
            Some("OGN-001"),
            StatusPatch {
                duplicate: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(OwnershipStatus::from(&saved), status(true, true, false));
    }
}
