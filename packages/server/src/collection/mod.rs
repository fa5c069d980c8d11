pub mod catalog;
pub mod mutate;
pub mod reconcile;
pub mod store;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::collection;

/// Structured composite key identifying one card in both the catalog and
/// the ownership store.
///
/// `number` is normalized to the empty string when the card has no
/// collector number. Normalization happens here, once, so map lookups and
/// the database primary key agree on a single representation (a NULL
/// number would break key uniqueness).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub name: String,
    pub number: String,
}

impl CardKey {
    pub fn new(name: impl Into<String>, number: Option<&str>) -> Self {
        Self {
            name: name.into(),
            number: number.unwrap_or("").trim().to_string(),
        }
    }

    /// Legacy wire form used by the status-mapping endpoint.
    ///
    /// Names containing the separator sequence would collide; internal
    /// lookups never use this form, it exists only for response
    /// compatibility.
    pub fn wire(&self) -> String {
        format!("{}|||{}", self.name, self.number)
    }
}

/// One catalog entry: a card name plus its optional collector number
/// (e.g. `OGN-001`, `OGN-012a`, `OGN-001*`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CardRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl CardRef {
    pub fn key(&self) -> CardKey {
        CardKey::new(self.name.clone(), self.number.as_deref())
    }
}

/// Per-card ownership flags. Defaults to all-false for cards the store
/// has never seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OwnershipStatus {
    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,
}

impl From<&collection::Model> for OwnershipStatus {
    fn from(m: &collection::Model) -> Self {
        Self {
            owned: m.owned,
            duplicate: m.duplicate,
            foil: m.foil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_normalizes_absent_number_to_empty() {
        assert_eq!(CardKey::new("Jinx", None), CardKey::new("Jinx", Some("")));
        assert_eq!(CardKey::new("Jinx", Some("  ")).number, "");
    }

    #[test]
    fn wire_form_joins_name_and_number() {
        assert_eq!(
            CardKey::new("Jinx", Some("OGN-001")).wire(),
            "Jinx|||OGN-001"
        );
        assert_eq!(CardKey::new("Jinx", None).wire(), "Jinx|||");
    }

    #[test]
    fn card_ref_omits_absent_number_on_the_wire() {
        let with = CardRef {
            name: "Jinx".to_string(),
            number: Some("OGN-001".to_string()),
        };
        let without = CardRef {
            name: "Token".to_string(),
            number: None,
        };
        assert_eq!(
            serde_json::to_value(&with).unwrap(),
            serde_json::json!({"name": "Jinx", "number": "OGN-001"})
        );
        assert_eq!(
            serde_json::to_value(&without).unwrap(),
            serde_json::json!({"name": "Token"})
        );
    }
}
