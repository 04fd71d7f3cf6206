//! Async bodies for the tasks the effect handler spawns.
//!
//! Every task resolves to exactly one [`Action`]; errors are logged here and
//! handed to the reducer as strings.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::action::Action;
use crate::api::EntryProvider;
use crate::artwork;
use crate::catalog::CatalogSource;

pub const CATALOG_TASK: &str = "catalog";

pub fn entry_task_key(mount_id: u64) -> String {
    format!("entry_{mount_id}")
}

/// Shared by both reveal timers of a cell; the second replaces the first.
pub fn reveal_task_key(mount_id: u64) -> String {
    format!("reveal_{mount_id}")
}

pub fn artwork_task_key(url: &str) -> String {
    format!("artwork_{url}")
}

/// Keys of every task that may still be running for a mounted cell.
pub fn cell_task_keys(mount_id: u64) -> [String; 2] {
    [entry_task_key(mount_id), reveal_task_key(mount_id)]
}

pub async fn load_catalog(
    provider: Arc<dyn EntryProvider>,
    request: u64,
    source: CatalogSource,
) -> Action {
    match provider.fetch_catalog(&source).await {
        Ok(page) => Action::CatalogDidLoad { request, page },
        Err(error) => {
            warn!(?source, %error, "catalog load failed");
            Action::CatalogDidError {
                request,
                error: error.to_string(),
            }
        }
    }
}

pub async fn fetch_entry(
    provider: Arc<dyn EntryProvider>,
    mount_id: u64,
    identifier: String,
) -> Action {
    debug!(mount_id, %identifier, "fetching entry");
    match provider.fetch_entry(&identifier).await {
        Ok(record) => Action::EntryDidLoad { mount_id, record },
        Err(error) => {
            warn!(mount_id, %identifier, %error, "entry fetch failed");
            Action::EntryDidError {
                mount_id,
                error: error.to_string(),
            }
        }
    }
}

pub async fn reveal_after(mount_id: u64, delay_ms: u64) -> Action {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Action::RevealDidStart { mount_id }
}

pub async fn reveal_end_after(mount_id: u64, delay_ms: u64) -> Action {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Action::RevealDidEnd { mount_id }
}

pub async fn load_artwork(provider: Arc<dyn EntryProvider>, url: String) -> Action {
    let bytes = match provider.fetch_bytes(&url).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(%url, %error, "artwork download failed");
            return Action::ArtworkDidError {
                url,
                error: error.to_string(),
            };
        }
    };
    match artwork::decode_artwork(&bytes) {
        Ok(image) => Action::ArtworkDidLoad { url, image },
        Err(error) => {
            warn!(%url, %error, "artwork decode failed");
            Action::ArtworkDidError { url, error }
        }
    }
}
