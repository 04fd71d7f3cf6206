//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pokecards::api::{EntryProvider, ProviderError};
use pokecards::catalog::{CatalogItem, CatalogPage, CatalogSource};
use pokecards::state::{ArtworkBundle, EntryRecord, EvolutionNode, LocalizedName, StatValue};

pub fn record(name: &str, shiny: bool) -> EntryRecord {
    EntryRecord {
        id: 133,
        name: LocalizedName {
            en: name.to_string(),
            jp: Some("イーブイ".to_string()),
        },
        region: Some("kanto".to_string()),
        generation: Some("generation-i".to_string()),
        height: Some(3),
        weight: Some(65),
        color: Some("brown".to_string()),
        description: Some("Its genes are unstable.".to_string()),
        types: vec!["normal".to_string()],
        abilities: Vec::new(),
        evolution: vec![EvolutionNode {
            name: name.to_string(),
            artwork: Some(format!("https://img/{name}.png")),
        }],
        stats: vec![StatValue {
            name: "hp".to_string(),
            base: 55,
        }],
        artwork: ArtworkBundle {
            default: Some(format!("https://img/{name}.png")),
            shiny: shiny.then(|| format!("https://img/{name}-shiny.png")),
        },
        has_shiny_variant: shiny,
    }
}

pub fn page(names: &[&str]) -> CatalogPage {
    CatalogPage {
        count: names.len(),
        results: names
            .iter()
            .map(|name| CatalogItem::Named {
                name: name.to_string(),
            })
            .collect(),
    }
}

/// In-memory provider that counts entry fetches.
#[derive(Default)]
pub struct FakeProvider {
    pub pages: HashMap<String, CatalogPage>,
    pub records: HashMap<String, EntryRecord>,
    pub bytes: HashMap<String, Vec<u8>>,
    pub entry_calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_records(names: &[&str]) -> Self {
        Self {
            records: names
                .iter()
                .map(|name| (name.to_string(), record(name, false)))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl EntryProvider for FakeProvider {
    async fn fetch_catalog(&self, source: &CatalogSource) -> Result<CatalogPage, ProviderError> {
        self.pages
            .get(&source.label())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(source.label()))
    }

    async fn fetch_entry(&self, identifier: &str) -> Result<EntryRecord, ProviderError> {
        if let Ok(mut calls) = self.entry_calls.lock() {
            calls.push(identifier.to_string());
        }
        self.records
            .get(identifier)
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                status: 500,
                url: identifier.to_string(),
            })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.bytes
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(url.to_string()))
    }
}
