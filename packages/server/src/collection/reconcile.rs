use std::collections::HashMap;

use super::catalog::display_number;
use super::{CardKey, CardRef, OwnershipStatus};

/// A catalog entry joined with its ownership flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinedCard {
    pub card: CardRef,
    pub status: OwnershipStatus,
}

/// A card the collection still lacks. `foil` distinguishes "never owned"
/// (false) from "owned in standard form but no foil copy yet" (true).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingEntry {
    pub card: CardRef,
    pub foil: bool,
}

/// Left join of the catalog against a store snapshot.
///
/// The catalog is authoritative for existence, the store for status:
/// output length always equals catalog length, catalog order is
/// preserved, and keys absent from the store default to all-false.
/// Orphan store rows are dropped.
pub fn list_with_status(
    refs: &[CardRef],
    statuses: &HashMap<CardKey, OwnershipStatus>,
) -> Vec<JoinedCard> {
    refs.iter()
        .map(|r| JoinedCard {
            card: r.clone(),
            status: statuses.get(&r.key()).copied().unwrap_or_default(),
        })
        .collect()
}

/// Catalog entries whose joined `owned` is false (absent counts as
/// false). `owned || duplicate` is deliberately not substituted: the
/// duplicate→owned invariant is enforced at write time, and a record
/// written before the invariant existed must show up here as missing.
pub fn missing(refs: &[CardRef], statuses: &HashMap<CardKey, OwnershipStatus>) -> Vec<CardRef> {
    refs.iter()
        .filter(|r| !statuses.get(&r.key()).is_some_and(|s| s.owned))
        .cloned()
        .collect()
}

/// Catalog entries with no store row at all, in catalog order. Distinct
/// from [`missing`]: a row with all-false flags still counts as covered
/// here. Used by the admin integrity report to spot entries a sync has
/// not reached yet.
pub fn absent_from_store(
    refs: &[CardRef],
    statuses: &HashMap<CardKey, OwnershipStatus>,
) -> Vec<CardRef> {
    refs.iter()
        .filter(|r| !statuses.contains_key(&r.key()))
        .cloned()
        .collect()
}

/// Missing list split by foil status: first every never-owned entry
/// (tagged `foil: false`), then every entry owned in standard form but
/// lacking a foil copy (tagged `foil: true`). Each group preserves
/// catalog order and no entry appears in both.
pub fn missing_with_foil_split(
    refs: &[CardRef],
    statuses: &HashMap<CardKey, OwnershipStatus>,
) -> Vec<MissingEntry> {
    let mut never_owned = Vec::new();
    let mut foil_missing = Vec::new();
    for r in refs {
        let status = statuses.get(&r.key()).copied().unwrap_or_default();
        if !status.owned {
            never_owned.push(MissingEntry {
                card: r.clone(),
                foil: false,
            });
        } else if !status.foil {
            foil_missing.push(MissingEntry {
                card: r.clone(),
                foil: true,
            });
        }
    }
    never_owned.extend(foil_missing);
    never_owned
}

/// Plain-text export: `"<number> - <name>"` per line, with the variant
/// tail stripped from the number and ` [FOIL]` appended for foil-missing
/// entries.
pub fn render_missing_txt(entries: &[MissingEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(display_number(entry.card.number.as_deref()));
        out.push_str(" - ");
        out.push_str(&entry.card.name);
        if entry.foil {
            out.push_str(" [FOIL]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, number: Option<&str>) -> CardRef {
        CardRef {
            name: name.to_string(),
            number: number.map(str::to_string),
        }
    }

    fn status(owned: bool, duplicate: bool, foil: bool) -> OwnershipStatus {
        OwnershipStatus {
            owned,
            duplicate,
            foil,
        }
    }

    fn store(entries: &[(&CardRef, OwnershipStatus)]) -> HashMap<CardKey, OwnershipStatus> {
        entries.iter().map(|(r, s)| (r.key(), *s)).collect()
    }

    #[test]
    fn join_is_total_over_the_catalog() {
        let refs = vec![
            card("Jinx", Some("OGN-001")),
            card("Viktor", Some("OGN-002")),
            card("Viktor", Some("OGN-002*")),
        ];
        let statuses = store(&[(&refs[1], status(true, false, false))]);

        let joined = list_with_status(&refs, &statuses);
        assert_eq!(joined.len(), refs.len());
        for (row, r) in joined.iter().zip(&refs) {
            assert_eq!(row.card, *r);
        }
        assert!(!joined[0].status.owned);
        assert!(joined[1].status.owned);
    }

    #[test]
    fn join_ignores_orphan_store_rows() {
        let refs = vec![card("Jinx", Some("OGN-001"))];
        let mut statuses = store(&[]);
        statuses.insert(CardKey::new("Removed Card", Some("OGN-999")), status(true, false, false));

        let joined = list_with_status(&refs, &statuses);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].card.name, "Jinx");
    }

    #[test]
    fn empty_store_lists_everything_missing() {
        let refs = vec![card("Jinx", Some("OGN-001"))];
        let statuses = HashMap::new();

        let joined = list_with_status(&refs, &statuses);
        assert_eq!(joined[0].status, OwnershipStatus::default());

        let missing = missing(&refs, &statuses);
        assert_eq!(missing, refs);
    }

    #[test]
    fn missing_complements_owned() {
        let refs = vec![
            card("A", Some("OGN-001")),
            card("B", Some("OGN-002")),
            card("C", Some("OGN-003")),
        ];
        let statuses = store(&[
            (&refs[0], status(true, false, false)),
            // Pre-invariant row: duplicate set but owned false. Still
            // counted as missing; the invariant is write-time only.
            (&refs[2], status(false, true, false)),
        ]);

        let missing = missing(&refs, &statuses);
        let missing_names: Vec<_> = missing.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(missing_names, ["B", "C"]);

        let owned: Vec<_> = list_with_status(&refs, &statuses)
            .into_iter()
            .filter(|j| j.status.owned)
            .map(|j| j.card)
            .collect();
        let mut union: Vec<_> = missing.iter().chain(owned.iter()).collect();
        union.sort_by_key(|r| r.number.clone());
        assert_eq!(union.len(), refs.len());
    }

    #[test]
    fn absent_counts_unsynced_entries_only() {
        let refs = vec![
            card("A", Some("OGN-001")),
            card("B", Some("OGN-002")),
            card("C", Some("OGN-003")),
        ];
        // A has a row with all-false flags: missing, but not absent.
        let statuses = store(&[(&refs[0], status(false, false, false))]);

        let absent = absent_from_store(&refs, &statuses);
        let names: Vec<_> = absent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
    }

    #[test]
    fn fully_synced_store_has_no_absences() {
        let refs = vec![card("A", Some("OGN-001")), card("B", None)];
        let statuses = store(&[
            (&refs[0], status(true, false, false)),
            (&refs[1], status(false, false, false)),
        ]);
        assert!(absent_from_store(&refs, &statuses).is_empty());
    }

    #[test]
    fn foil_split_groups_are_disjoint_and_ordered() {
        let refs = vec![
            card("A", Some("OGN-001")),
            card("B", Some("OGN-002")),
            card("C", Some("OGN-003")),
            card("D", Some("OGN-004")),
        ];
        let statuses = store(&[
            (&refs[0], status(true, false, false)), // owned, no foil
            (&refs[2], status(true, false, true)),  // owned with foil
        ]);

        let split = missing_with_foil_split(&refs, &statuses);
        // Group (a) in catalog order, then group (b).
        let tagged: Vec<_> = split
            .iter()
            .map(|e| (e.card.name.as_str(), e.foil))
            .collect();
        assert_eq!(tagged, [("B", false), ("D", false), ("A", true)]);

        // No card in both groups.
        let mut seen = std::collections::HashSet::new();
        assert!(split.iter().all(|e| seen.insert(e.card.key())));
    }

    #[test]
    fn owned_standard_card_appears_once_as_foil_missing() {
        let refs = vec![card("Jinx", Some("OGN-001"))];
        let statuses = store(&[(&refs[0], status(true, false, false))]);

        let split = missing_with_foil_split(&refs, &statuses);
        assert_eq!(split.len(), 1);
        assert!(split[0].foil);
        assert_eq!(split[0].card.name, "Jinx");
    }

    #[test]
    fn txt_rendering_strips_variants_and_tags_foil() {
        let entries = vec![
            MissingEntry {
                card: card("Jinx", Some("OGN-001*")),
                foil: false,
            },
            MissingEntry {
                card: card("Viktor", Some("OGN-298/299")),
                foil: true,
            },
        ];
        assert_eq!(
            render_missing_txt(&entries),
            "OGN-001 - Jinx\nOGN-298 - Viktor [FOIL]\n"
        );
    }
}
