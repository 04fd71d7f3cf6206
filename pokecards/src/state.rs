use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::artwork::ArtworkImage;
use crate::catalog::{CatalogRange, CatalogSource};
use crate::cell::EntryCell;

pub const DEFAULT_REVEAL_DELAY_MS: u64 = 1200;
pub const DEFAULT_PULSE_MS: u64 = 600;
pub const TICK_MS: u64 = 90;

/// Terminal columns taken by one card, border included.
pub const CARD_WIDTH: u16 = 26;
/// Terminal rows taken by one card, border included.
pub const CARD_HEIGHT: u16 = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub en: String,
    pub jp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub slot: u8,
    pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub name: String,
    pub artwork: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub base: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkBundle {
    pub default: Option<String>,
    pub shiny: Option<String>,
}

/// Everything the provider knows about one catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: u16,
    pub name: LocalizedName,
    pub region: Option<String>,
    pub generation: Option<String>,
    pub height: Option<u16>,
    pub weight: Option<u16>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<Ability>,
    pub evolution: Vec<EvolutionNode>,
    pub stats: Vec<StatValue>,
    pub artwork: ArtworkBundle,
    pub has_shiny_variant: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub reveal_delay_ms: u64,
    pub pulse_ms: u64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            pulse_ms: DEFAULT_PULSE_MS,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub range: CatalogRange,
    pub source: CatalogSource,
    pub catalog_request: u64,
    pub catalog_loading: bool,
    pub catalog_empty: bool,

    pub cells: Vec<EntryCell>,
    pub next_mount_id: u64,
    pub selected_index: usize,

    pub search: SearchState,
    pub artwork: HashMap<String, ArtworkImage>,
    pub artwork_pending: HashSet<String>,
    pub artwork_failed: HashSet<String>,

    pub timing: RevealTiming,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CatalogRange::default(), RevealTiming::default())
    }
}

impl AppState {
    pub fn new(range: CatalogRange, timing: RevealTiming) -> Self {
        Self {
            terminal_size: (80, 24),
            range,
            source: CatalogSource::Range(range),
            catalog_request: 0,
            catalog_loading: false,
            catalog_empty: false,
            cells: Vec::new(),
            next_mount_id: 1,
            selected_index: 0,
            search: SearchState::default(),
            artwork: HashMap::new(),
            artwork_pending: HashSet::new(),
            artwork_failed: HashSet::new(),
            timing,
            message: None,
            tick: 0,
        }
    }

    pub fn with_source(mut self, source: CatalogSource) -> Self {
        self.source = source;
        self
    }

    pub fn selected_cell(&self) -> Option<&EntryCell> {
        self.cells.get(self.selected_index)
    }

    pub fn selected_cell_mut(&mut self) -> Option<&mut EntryCell> {
        self.cells.get_mut(self.selected_index)
    }

    pub fn cell_by_mount(&mut self, mount_id: u64) -> Option<&mut EntryCell> {
        self.cells.iter_mut().find(|cell| cell.mount_id == mount_id)
    }

    /// The cell whose detail overlay is currently shown, if any.
    pub fn overlay_cell(&self) -> Option<&EntryCell> {
        self.cells.iter().find(|cell| cell.detail_overlay_open)
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_cell().is_some()
    }

    pub fn any_loading(&self) -> bool {
        self.catalog_loading || self.cells.iter().any(|cell| cell.loading)
    }

    pub fn grid_columns(&self) -> usize {
        (self.terminal_size.0 / CARD_WIDTH).max(1) as usize
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.cells.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.cells.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn take_mount_id(&mut self) -> u64 {
        let id = self.next_mount_id;
        self.next_mount_id += 1;
        id
    }

    pub fn type_filter(&self) -> Option<&str> {
        match &self.source {
            CatalogSource::Type(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("source", ron_string(&self.source))
                .entry("request", ron_string(&self.catalog_request))
                .entry("loading", ron_string(&self.catalog_loading))
                .entry("empty", ron_string(&self.catalog_empty))
                .entry("cells", ron_string(&self.cells.len()))
                .entry("selected", ron_string(&self.selected_index)),
            DebugSection::new("Selected")
                .entry(
                    "identifier",
                    ron_string(&self.selected_cell().map(|cell| cell.identifier.clone())),
                )
                .entry(
                    "mount",
                    ron_string(&self.selected_cell().map(|cell| cell.mount_id)),
                )
                .entry(
                    "phase",
                    ron_string(&self.selected_cell().map(|cell| cell.phase())),
                ),
            DebugSection::new("Status")
                .entry("artwork_cached", ron_string(&self.artwork.len()))
                .entry("artwork_pending", ron_string(&self.artwork_pending.len()))
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
