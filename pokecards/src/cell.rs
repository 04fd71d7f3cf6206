//! Per-entry card state.
//!
//! A cell is mounted for one identifier and carries a unique `mount_id`.
//! Every async result addressed to a cell quotes that ticket, so a result for
//! a cell that was unmounted (or remounted for a new fetch) finds nothing to
//! update and is dropped by the reducer.

use serde::{Deserialize, Serialize};

use crate::format::{capitalize, or_na, title_case};
use crate::state::EntryRecord;

pub const DEFAULT_THEME: &str = "default";
/// Added to the record height to size the card artwork.
pub const LAYOUT_HEIGHT_OFFSET: u32 = 250;
pub const PLACEHOLDER_LAYOUT_HEIGHT: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Which artwork a card currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayedArtwork<'a> {
    Variant(&'a str),
    Default(&'a str),
    Placeholder,
}

impl<'a> DisplayedArtwork<'a> {
    pub fn url(&self) -> Option<&'a str> {
        match *self {
            DisplayedArtwork::Variant(url) | DisplayedArtwork::Default(url) => Some(url),
            DisplayedArtwork::Placeholder => None,
        }
    }
}

/// Text rows of a collapsed card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardText {
    pub id: String,
    pub name: String,
    pub region: String,
    pub height: String,
    pub weight: String,
    pub name_jp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryCell {
    pub mount_id: u64,
    pub identifier: String,
    pub record: Option<EntryRecord>,
    pub variant_selected: bool,
    pub reveal_pulse_active: bool,
    pub loading: bool,
    pub detail_overlay_open: bool,
    pub error: Option<String>,
}

impl EntryCell {
    pub fn mount(mount_id: u64, identifier: impl Into<String>) -> Self {
        Self {
            mount_id,
            identifier: identifier.into(),
            record: None,
            variant_selected: false,
            reveal_pulse_active: false,
            loading: false,
            detail_overlay_open: false,
            error: None,
        }
    }

    pub fn phase(&self) -> CellPhase {
        if self.loading {
            CellPhase::Loading
        } else if self.error.is_some() {
            CellPhase::Failed
        } else if self.record.is_some() {
            CellPhase::Loaded
        } else {
            CellPhase::Idle
        }
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Stores the record; `loading` stays set until the reveal fires.
    pub fn apply_record(&mut self, record: EntryRecord) {
        self.record = Some(record);
        self.error = None;
    }

    pub fn begin_reveal(&mut self) -> bool {
        if !self.loading || self.record.is_none() {
            return false;
        }
        self.loading = false;
        self.reveal_pulse_active = true;
        true
    }

    pub fn end_reveal(&mut self) -> bool {
        if !self.reveal_pulse_active {
            return false;
        }
        self.reveal_pulse_active = false;
        true
    }

    pub fn fail(&mut self, error: String) {
        self.loading = false;
        self.reveal_pulse_active = false;
        self.error = Some(error);
    }

    pub fn open_overlay(&mut self) -> bool {
        if self.record.is_none() || self.detail_overlay_open {
            return false;
        }
        self.detail_overlay_open = true;
        true
    }

    pub fn close_overlay(&mut self) -> bool {
        if !self.detail_overlay_open {
            return false;
        }
        self.detail_overlay_open = false;
        true
    }

    pub fn shows_variant_toggle(&self) -> bool {
        !self.loading
            && self
                .record
                .as_ref()
                .is_some_and(|record| record.has_shiny_variant)
    }

    pub fn toggle_variant(&mut self) -> bool {
        if !self.shows_variant_toggle() {
            return false;
        }
        self.variant_selected = !self.variant_selected;
        true
    }

    pub fn theme_token(&self) -> &str {
        self.record
            .as_ref()
            .and_then(|record| record.color.as_deref())
            .unwrap_or(DEFAULT_THEME)
    }

    pub fn displayed_artwork(&self) -> DisplayedArtwork<'_> {
        let Some(record) = self.record.as_ref() else {
            return DisplayedArtwork::Placeholder;
        };
        if self.variant_selected && record.has_shiny_variant {
            if let Some(url) = record.artwork.shiny.as_deref() {
                return DisplayedArtwork::Variant(url);
            }
        }
        match record.artwork.default.as_deref() {
            Some(url) => DisplayedArtwork::Default(url),
            None => DisplayedArtwork::Placeholder,
        }
    }

    pub fn layout_height(&self) -> u32 {
        match self.record.as_ref() {
            Some(record) => u32::from(record.height.unwrap_or(0)) + LAYOUT_HEIGHT_OFFSET,
            None => PLACEHOLDER_LAYOUT_HEIGHT,
        }
    }

    pub fn card_text(&self) -> CardText {
        let record = self.record.as_ref();
        CardText {
            id: format!("#{}", or_na(record.map(|record| record.id))),
            name: title_case(&self.identifier),
            region: format!(
                "Region: {}",
                or_na(
                    record
                        .and_then(|record| record.region.as_deref())
                        .map(capitalize)
                )
            ),
            height: format!(
                "Height: {}",
                or_na(record.and_then(|record| record.height))
            ),
            weight: format!(
                "Weight: {}",
                or_na(record.and_then(|record| record.weight))
            ),
            name_jp: record
                .and_then(|record| record.name.jp.clone())
                .unwrap_or_default(),
        }
    }
}
