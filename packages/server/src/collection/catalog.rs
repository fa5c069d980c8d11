use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::CardRef;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source unreadable: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Parse the tab-separated reference list into catalog order.
///
/// Line 0 is the header and always skipped. Each data line is
/// `number<TAB>name`; lines that are empty, have fewer than two columns,
/// or a blank name are skipped. Duplicate names are kept: a catalog may
/// legitimately list the same name under several numbers (variant rows),
/// and each row is a distinct entry by key.
pub fn parse_catalog(raw: &str) -> Vec<CardRef> {
    let mut out = Vec::new();
    for line in raw.lines().skip(1) {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, '\t');
        let (Some(number), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let number = number.trim();
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        out.push(CardRef {
            name: name.to_string(),
            number: (!number.is_empty()).then(|| number.to_string()),
        });
    }
    out
}

/// Read the reference list fresh from disk.
pub async fn read_catalog(path: &Path) -> Result<Vec<CardRef>, CatalogError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(parse_catalog(&raw))
}

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(OG[NS])-(\d+)([a-z])?").expect("valid number pattern"));

/// Sort key over collector numbers: set prefix (OGN before OGS, unknown
/// last), numeric part ascending, suffix-less before lettered suffix,
/// non-star before star. Name is the final tie-break at the call site.
pub fn number_sort_key(number: Option<&str>) -> (u8, u32, u8, u8) {
    let Some(number) = number else {
        return (2, u32::MAX, 0, 0);
    };
    // Variant tail after '/' never participates in ordering.
    let base = number.split('/').next().unwrap_or("");
    let star = u8::from(base.contains('*'));
    let Some(caps) = NUMBER_RE.captures(base) else {
        return (2, u32::MAX, 0, star);
    };
    let set_rank = match caps[1].to_ascii_uppercase().as_str() {
        "OGN" => 0,
        "OGS" => 1,
        _ => 2,
    };
    let num = caps[2].parse::<u32>().unwrap_or(u32::MAX);
    let suffix_rank = u8::from(caps.get(3).is_some());
    (set_rank, num, suffix_rank, star)
}

/// Compare two catalog entries by collector number, then name.
pub fn compare_refs(a: &CardRef, b: &CardRef) -> Ordering {
    number_sort_key(a.number.as_deref())
        .cmp(&number_sort_key(b.number.as_deref()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Collector number as shown in exports: variant tail (`/...`) and
/// trailing `*` stripped.
pub fn display_number(number: Option<&str>) -> &str {
    number
        .and_then(|n| n.split('/').next())
        .unwrap_or("")
        .trim_end_matches('*')
}
