//! Catalog input and keyed reconciliation of mounted cells.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cell::EntryCell;

pub const DEFAULT_LIMIT: u32 = 151;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// One catalog result; list endpoints return `{ name }` while type
/// endpoints nest it as `{ pokemon: { name } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogItem {
    Named { name: String },
    Nested { pokemon: NamedRef },
}

impl CatalogItem {
    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Named { name } => name,
            CatalogItem::Nested { pokemon } => &pokemon.name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub count: usize,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

impl CatalogPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty_state(&self) -> bool {
        self.count == 0
    }

    /// Identifiers in display order, duplicates dropped. A zero count wins
    /// over whatever `results` holds.
    pub fn identifiers(&self) -> Vec<String> {
        if self.is_empty_state() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        self.results
            .iter()
            .map(CatalogItem::name)
            .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRange {
    pub limit: u32,
    pub offset: u32,
}

impl Default for CatalogRange {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogSource {
    Range(CatalogRange),
    Type(String),
    Search(String),
}

impl CatalogSource {
    pub fn label(&self) -> String {
        match self {
            CatalogSource::Range(range) => format!(
                "#{}-#{}",
                range.offset + 1,
                range.offset + range.limit
            ),
            CatalogSource::Type(name) => format!("type: {name}"),
            CatalogSource::Search(query) => format!("search: {query}"),
        }
    }
}

/// Result of matching a new identifier sequence against the mounted cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Newly mounted cells as `(mount_id, identifier)`.
    pub mounted: Vec<(u64, String)>,
    /// Mount ids of cells that were dropped.
    pub released: Vec<u64>,
}

/// Rebuilds `cells` in the order of `identifiers`. Cells whose identifier
/// survives keep their state; new identifiers get a fresh mount.
pub fn reconcile(
    cells: &mut Vec<EntryCell>,
    identifiers: &[String],
    mut next_mount_id: impl FnMut() -> u64,
) -> Reconciled {
    let mut previous: HashMap<String, EntryCell> = cells
        .drain(..)
        .map(|cell| (cell.identifier.clone(), cell))
        .collect();
    let mut reconciled = Reconciled::default();

    for identifier in identifiers {
        match previous.remove(identifier) {
            Some(cell) => cells.push(cell),
            None => {
                let mount_id = next_mount_id();
                cells.push(EntryCell::mount(mount_id, identifier.clone()));
                reconciled.mounted.push((mount_id, identifier.clone()));
            }
        }
    }

    reconciled.released = previous.into_values().map(|cell| cell.mount_id).collect();
    reconciled.released.sort_unstable();
    reconciled
}
