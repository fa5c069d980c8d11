use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::collection::mutate::StatusPatch;
use crate::collection::reconcile::{JoinedCard, MissingEntry};
use crate::entity::collection;
use crate::utils::images::{candidate_image_urls, initials_from_name};

fn opt_number(number: String) -> Option<String> {
    (!number.is_empty()).then_some(number)
}

/// One catalog entry joined with its ownership flags.
#[derive(Serialize, ToSchema)]
pub struct CardRowResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,
    /// Local art path the grid tries first.
    pub image: String,
    /// Fallback shown when no art has been downloaded for this card.
    pub initials: String,
}

impl From<JoinedCard> for CardRowResponse {
    fn from(j: JoinedCard) -> Self {
        let image = candidate_image_urls(&j.card.name).swap_remove(0);
        let initials = initials_from_name(&j.card.name);
        Self {
            name: j.card.name,
            number: j.card.number,
            owned: j.status.owned,
            duplicate: j.status.duplicate,
            foil: j.status.foil,
            image,
            initials,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub name: String,
    pub number: Option<String>,
    #[serde(flatten)]
    pub patch: StatusPatch,
}

/// The final merged record after a status update.
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<collection::Model> for StatusResponse {
    fn from(m: collection::Model) -> Self {
        Self {
            name: m.name,
            number: opt_number(m.number),
            owned: m.owned,
            duplicate: m.duplicate,
            foil: m.foil,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MissingEntryResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub foil: bool,
}

impl From<MissingEntry> for MissingEntryResponse {
    fn from(e: MissingEntry) -> Self {
        Self {
            name: e.card.name,
            number: e.card.number,
            foil: e.foil,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MissingQuery {
    /// `json` (default) or `txt`.
    pub format: Option<String>,
    /// When true, split the JSON list into never-owned and foil-missing
    /// entries (the txt format always splits).
    pub foil: Option<bool>,
}
