use crate::catalog::CatalogSource;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog { request: u64, source: CatalogSource },
    FetchEntry { mount_id: u64, identifier: String },
    ScheduleReveal { mount_id: u64, delay_ms: u64 },
    ScheduleRevealEnd { mount_id: u64, delay_ms: u64 },
    /// Cancels every task still running for an unmounted cell.
    ReleaseCell { mount_id: u64 },
    LoadArtwork { url: String },
}
