use tracing::{debug, info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::assets;
use crate::catalog::{self, CatalogSource};
use crate::cell::EntryCell;
use crate::detail;
use crate::effect::Effect;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let source = state.source.clone();
            load_catalog(state, source)
        }

        Action::CatalogDidLoad { request, page } => {
            if request != state.catalog_request {
                debug!(request, latest = state.catalog_request, "dropping stale catalog");
                return DispatchResult::unchanged();
            }
            state.catalog_loading = false;
            state.catalog_empty = page.is_empty_state();
            state.message = None;
            let identifiers = page.identifiers();
            info!(count = identifiers.len(), source = ?state.source, "catalog loaded");
            let effects = mount_catalog(state, &identifiers);
            changed_with_effects(effects)
        }

        Action::CatalogDidError { request, error } => {
            if request != state.catalog_request {
                return DispatchResult::unchanged();
            }
            state.catalog_loading = false;
            state.message = Some(format!("Catalog error: {error}"));
            DispatchResult::changed()
        }

        Action::EntryDidLoad { mount_id, record } => {
            let delay_ms = state.timing.reveal_delay_ms;
            let Some(cell) = state.cell_by_mount(mount_id) else {
                debug!(mount_id, "dropping entry for unmounted cell");
                return DispatchResult::unchanged();
            };
            if !cell.loading {
                return DispatchResult::unchanged();
            }
            cell.apply_record(record);
            DispatchResult::changed_with(Effect::ScheduleReveal { mount_id, delay_ms })
        }

        Action::EntryDidError { mount_id, error } => {
            let Some(cell) = state.cell_by_mount(mount_id) else {
                debug!(mount_id, "dropping error for unmounted cell");
                return DispatchResult::unchanged();
            };
            warn!(mount_id, identifier = %cell.identifier, %error, "entry failed");
            cell.fail(error);
            DispatchResult::changed()
        }

        Action::EntryReload => {
            if state.overlay_open() {
                return DispatchResult::unchanged();
            }
            let mount_id = state.take_mount_id();
            let Some(cell) = state.selected_cell_mut() else {
                return DispatchResult::unchanged();
            };
            let released = cell.mount_id;
            let identifier = cell.identifier.clone();
            *cell = EntryCell::mount(mount_id, identifier.clone());
            cell.begin_fetch();
            DispatchResult::changed_with_many(vec![
                Effect::ReleaseCell {
                    mount_id: released,
                },
                Effect::FetchEntry {
                    mount_id,
                    identifier,
                },
            ])
        }

        Action::RevealDidStart { mount_id } => {
            let delay_ms = state.timing.pulse_ms;
            let artwork = {
                let Some(cell) = state.cell_by_mount(mount_id) else {
                    return DispatchResult::unchanged();
                };
                if !cell.begin_reveal() {
                    return DispatchResult::unchanged();
                }
                displayed_url(cell)
            };
            let mut effects = vec![Effect::ScheduleRevealEnd { mount_id, delay_ms }];
            effects.extend(request_artwork(state, artwork));
            DispatchResult::changed_with_many(effects)
        }

        Action::RevealDidEnd { mount_id } => {
            if state
                .cell_by_mount(mount_id)
                .is_some_and(|cell| cell.end_reveal())
            {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ArtworkDidLoad { url, image } => {
            state.artwork_pending.remove(&url);
            state.artwork.insert(url, image);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { url, error } => {
            debug!(%url, %error, "artwork unavailable");
            state.artwork_pending.remove(&url);
            state.artwork_failed.insert(url);
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => move_selection(state, i64::from(delta)),

        Action::SelectionRow(delta) => {
            let columns = state.grid_columns() as i64;
            move_selection(state, i64::from(delta) * columns)
        }

        Action::CardSelect(index) => {
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::OverlayOpen => {
            if state.overlay_open() || state.search.active {
                return DispatchResult::unchanged();
            }
            let urls = {
                let Some(cell) = state.selected_cell_mut() else {
                    return DispatchResult::unchanged();
                };
                if !cell.open_overlay() {
                    return DispatchResult::unchanged();
                }
                overlay_artwork_urls(cell)
            };
            let effects = urls
                .into_iter()
                .filter_map(|url| request_artwork(state, Some(url)))
                .collect();
            changed_with_effects(effects)
        }

        Action::OverlayClose => {
            let mut closed = false;
            for cell in &mut state.cells {
                closed |= cell.close_overlay();
            }
            if closed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::VariantToggle => {
            let artwork = {
                let Some(cell) = state.selected_cell_mut() else {
                    return DispatchResult::unchanged();
                };
                if !cell.toggle_variant() {
                    return DispatchResult::unchanged();
                }
                displayed_url(cell)
            };
            changed_with_effects(request_artwork(state, artwork).into_iter().collect())
        }

        Action::TypeFilterNext => cycle_type_filter(state, 1),
        Action::TypeFilterPrev => cycle_type_filter(state, -1),

        Action::TypeFilterClear => {
            if matches!(state.source, CatalogSource::Range(_)) {
                return DispatchResult::unchanged();
            }
            let source = CatalogSource::Range(state.range);
            load_catalog(state, source)
        }

        Action::SearchStart => {
            if state.overlay_open() {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            let query = state.search.query.trim().to_string();
            let source = if query.is_empty() {
                CatalogSource::Range(state.range)
            } else {
                CatalogSource::Search(query)
            };
            load_catalog(state, source)
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            let animating = state.any_loading()
                || state.cells.iter().any(|cell| cell.reveal_pulse_active);
            if !animating {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with_effects(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn load_catalog(state: &mut AppState, source: CatalogSource) -> DispatchResult<Effect> {
    state.catalog_request += 1;
    state.catalog_loading = true;
    state.message = None;
    state.source = source.clone();
    DispatchResult::changed_with(Effect::LoadCatalog {
        request: state.catalog_request,
        source,
    })
}

/// Reconciles mounted cells against the new identifiers and returns the
/// fetch and release effects for the difference.
fn mount_catalog(state: &mut AppState, identifiers: &[String]) -> Vec<Effect> {
    let mut next_mount_id = state.next_mount_id;
    let reconciled = catalog::reconcile(&mut state.cells, identifiers, || {
        let id = next_mount_id;
        next_mount_id += 1;
        id
    });
    state.next_mount_id = next_mount_id;

    let mut effects: Vec<Effect> = reconciled
        .released
        .into_iter()
        .map(|mount_id| Effect::ReleaseCell { mount_id })
        .collect();
    for (mount_id, identifier) in reconciled.mounted {
        if let Some(cell) = state.cell_by_mount(mount_id) {
            cell.begin_fetch();
        }
        effects.push(Effect::FetchEntry {
            mount_id,
            identifier,
        });
    }

    if state.selected_index >= state.cells.len() {
        state.selected_index = 0;
    }
    effects
}

fn move_selection(state: &mut AppState, delta: i64) -> DispatchResult<Effect> {
    if state.cells.is_empty() {
        return DispatchResult::unchanged();
    }
    let last = state.cells.len() as i64 - 1;
    let index = (state.selected_index as i64 + delta).clamp(0, last);
    if !state.set_selected_index(index as usize) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed()
}

fn cycle_type_filter(state: &mut AppState, direction: i32) -> DispatchResult<Effect> {
    let names: Vec<&str> = assets::type_names().collect();
    let current = state
        .type_filter()
        .and_then(|name| names.iter().position(|candidate| *candidate == name));
    let len = names.len() as i32;
    let next = match current {
        Some(index) => (index as i32 + direction).rem_euclid(len),
        None if direction >= 0 => 0,
        None => len - 1,
    };
    let source = CatalogSource::Type(names[next as usize].to_string());
    load_catalog(state, source)
}

fn displayed_url(cell: &EntryCell) -> Option<String> {
    cell.displayed_artwork().url().map(str::to_string)
}

fn overlay_artwork_urls(cell: &EntryCell) -> Vec<String> {
    let Some(record) = cell.record.as_ref() else {
        return Vec::new();
    };
    let mut urls: Vec<String> = record.artwork.default.iter().cloned().collect();
    urls.extend(
        detail::evolution_members(record)
            .into_iter()
            .filter_map(|node| node.artwork.clone()),
    );
    urls
}

/// Queues a download unless the artwork is cached, in flight or known bad.
fn request_artwork(state: &mut AppState, url: Option<String>) -> Option<Effect> {
    let url = url?;
    if state.artwork.contains_key(&url)
        || state.artwork_pending.contains(&url)
        || state.artwork_failed.contains(&url)
    {
        return None;
    }
    state.artwork_pending.insert(url.clone());
    Some(Effect::LoadArtwork { url })
}
