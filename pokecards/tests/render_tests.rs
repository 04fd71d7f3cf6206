//! Whole-screen renders of the catalog and overlay.

mod common;

use pokecards::{
    action::Action,
    assets::TypeIconRegistry,
    components::{
        CatalogView, CatalogViewProps, Component, DetailOverlay, DetailOverlayProps,
        EMPTY_MESSAGE,
    },
    reducer::reducer,
    state::{Ability, AppState, EvolutionNode, StatValue},
};
use tui_dispatch::testing::*;

use common::{page, record};

fn revealed_state(names: &[&str], shiny: bool) -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::UiTerminalResize(80, 40));
    reducer(&mut state, Action::Init);
    reducer(
        &mut state,
        Action::CatalogDidLoad {
            request: 1,
            page: page(names),
        },
    );
    for (index, name) in names.iter().enumerate() {
        let mount_id = index as u64 + 1;
        reducer(
            &mut state,
            Action::EntryDidLoad {
                mount_id,
                record: record(name, shiny),
            },
        );
        reducer(&mut state, Action::RevealDidStart { mount_id });
        reducer(&mut state, Action::RevealDidEnd { mount_id });
    }
    state
}

fn render_catalog(state: &AppState) -> String {
    let mut render = RenderHarness::new(80, 40);
    let mut view = CatalogView::new();
    render.render_to_string_plain(|frame| {
        view.render(
            frame,
            frame.area(),
            CatalogViewProps {
                state,
                is_focused: true,
            },
        );
    })
}

#[test]
fn grid_shows_every_card() {
    let state = revealed_state(&["eevee", "vaporeon", "jolteon"], false);
    let output = render_catalog(&state);
    assert!(output.contains("Eevee"));
    assert!(output.contains("Vaporeon"));
    assert!(output.contains("Jolteon"));
    assert!(output.contains("Region: Kanto"));
    assert!(output.contains("3 cards"));
}

#[test]
fn loading_cards_show_loader_text() {
    let mut state = AppState::default();
    reducer(&mut state, Action::Init);
    reducer(
        &mut state,
        Action::CatalogDidLoad {
            request: 1,
            page: page(&["eevee"]),
        },
    );
    let output = render_catalog(&state);
    assert!(output.contains("Loading..."));
    assert!(!output.contains("Region:"));
}

#[test]
fn shiny_hint_follows_variant_availability() {
    let output = render_catalog(&revealed_state(&["eevee"], true));
    assert!(output.contains("s: shiny"));

    let output = render_catalog(&revealed_state(&["eevee"], false));
    assert!(!output.contains("s: shiny"));
}

#[test]
fn empty_catalog_shows_message() {
    let mut state = AppState::default();
    reducer(&mut state, Action::Init);
    reducer(
        &mut state,
        Action::CatalogDidLoad {
            request: 1,
            page: page(&[]),
        },
    );
    let output = render_catalog(&state);
    assert!(output.contains(EMPTY_MESSAGE));
}

#[test]
fn catalog_error_reaches_status_bar() {
    let mut state = AppState::default();
    reducer(&mut state, Action::Init);
    reducer(
        &mut state,
        Action::CatalogDidError {
            request: 1,
            error: "offline".into(),
        },
    );
    let output = render_catalog(&state);
    assert!(output.contains("offline"));
}

#[test]
fn overlay_renders_detail_sheet() {
    let mut state = revealed_state(&["eevee"], false);
    reducer(&mut state, Action::OverlayOpen);
    let cell = state.overlay_cell().unwrap();
    let icons = TypeIconRegistry::builtin();

    let mut render = RenderHarness::new(100, 40);
    let mut overlay = DetailOverlay::new();
    let output = render.render_to_string_plain(|frame| {
        overlay.render(
            frame,
            frame.area(),
            DetailOverlayProps {
                cell,
                artwork: &state.artwork,
                icons: &icons,
                is_focused: true,
            },
        );
    });
    assert!(output.contains("#133"));
    assert!(output.contains("NORMAL"));
    assert!(output.contains("1 ft"));
    assert!(output.contains("14 lbs"));
    assert!(output.contains("Generation: I"));
    assert!(!output.contains("Evolution"));
}

#[test]
fn overlay_keeps_every_stat_on_a_small_terminal() {
    let mut state = revealed_state(&["vaporeon"], false);
    if let Some(record) = state.cells[0].record.as_mut() {
        record.stats = [
            ("hp", 130),
            ("attack", 65),
            ("defense", 60),
            ("special-attack", 110),
            ("special-defense", 95),
            ("speed", 65),
        ]
        .into_iter()
        .map(|(name, base)| StatValue {
            name: name.to_string(),
            base,
        })
        .collect();
        record.abilities = vec![
            Ability {
                name: "water-absorb".into(),
                slot: 1,
                hidden: false,
            },
            Ability {
                name: "hydration".into(),
                slot: 3,
                hidden: true,
            },
        ];
        record.evolution = ["eevee", "vaporeon"]
            .into_iter()
            .map(|name| EvolutionNode {
                name: name.into(),
                artwork: None,
            })
            .collect();
    }
    reducer(&mut state, Action::OverlayOpen);
    let cell = state.overlay_cell().unwrap();
    let icons = TypeIconRegistry::builtin();

    let mut render = RenderHarness::new(80, 24);
    let mut overlay = DetailOverlay::new();
    let output = render.render_to_string_plain(|frame| {
        overlay.render(
            frame,
            frame.area(),
            DetailOverlayProps {
                cell,
                artwork: &state.artwork,
                icons: &icons,
                is_focused: true,
            },
        );
    });
    assert!(output.contains("Base stats"));
    for label in ["HP ", "ATK ", "DEF ", "SpA ", "SpD ", "SPD "] {
        assert!(output.contains(label), "missing {label}");
    }
    assert!(output.contains("Water Absorb"));
    assert!(output.contains("Hydration"));
    assert!(output.contains("Evolution"));
    assert!(output.contains("Eevee"));
    assert!(output.contains("pokedex/vaporeon"));
}
