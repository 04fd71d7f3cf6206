use serde::{Deserialize, Serialize};

use crate::artwork::ArtworkImage;
use crate::catalog::CatalogPage;
use crate::state::EntryRecord;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    CatalogDidLoad { request: u64, page: CatalogPage },
    CatalogDidError { request: u64, error: String },

    EntryDidLoad { mount_id: u64, record: EntryRecord },
    EntryDidError { mount_id: u64, error: String },
    EntryReload,

    RevealDidStart { mount_id: u64 },
    RevealDidEnd { mount_id: u64 },

    ArtworkDidLoad { url: String, image: ArtworkImage },
    ArtworkDidError { url: String, error: String },

    SelectionMove(i16),
    SelectionRow(i16),
    CardSelect(usize),

    OverlayOpen,
    OverlayClose,
    VariantToggle,

    TypeFilterNext,
    TypeFilterPrev,
    TypeFilterClear,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
