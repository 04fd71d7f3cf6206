pub mod catalog_view;
pub mod detail_overlay;
pub mod entry_card;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_view::{catalog_layout, CatalogView, CatalogViewProps, EMPTY_MESSAGE};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use entry_card::{EntryCard, EntryCardProps};
pub use search_bar::{SearchBar, SearchBarProps};
