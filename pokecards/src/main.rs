//! Pokecards - a card-grid Pokedex for the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokecards::action::Action;
use pokecards::api::{EntryProvider, PokeApiProvider, API_BASE};
use pokecards::assets::TypeIconRegistry;
use pokecards::catalog::{CatalogRange, CatalogSource, DEFAULT_LIMIT};
use pokecards::components::{
    catalog_layout, CatalogView, CatalogViewProps, Component, DetailOverlay, DetailOverlayProps,
    SearchBar, SearchBarProps,
};
use pokecards::effect::Effect;
use pokecards::reducer::reducer;
use pokecards::state::{AppState, RevealTiming, DEFAULT_PULSE_MS, DEFAULT_REVEAL_DELAY_MS, TICK_MS};
use pokecards::tasks;
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

#[derive(Parser, Debug)]
#[command(name = "pokecards")]
#[command(about = "Browse Pokemon as a grid of cards")]
struct Args {
    /// Number of national dex entries to list
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    /// Offset into the national dex
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Start filtered to one type
    #[arg(long = "type", conflicts_with = "search")]
    type_name: Option<String>,

    /// Start with a name search
    #[arg(long)]
    search: Option<String>,

    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Delay between a record arriving and the card revealing
    #[arg(long, default_value_t = DEFAULT_REVEAL_DELAY_MS)]
    reveal_delay_ms: u64,

    /// Length of the reveal pulse
    #[arg(long, default_value_t = DEFAULT_PULSE_MS)]
    pulse_ms: u64,

    /// Directory for the rolling log file
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn initial_state(&self) -> AppState {
        let range = CatalogRange {
            limit: self.limit,
            offset: self.offset,
        };
        let timing = RevealTiming {
            reveal_delay_ms: self.reveal_delay_ms,
            pulse_ms: self.pulse_ms,
        };
        let source = match (&self.type_name, &self.search) {
            (Some(name), _) => CatalogSource::Type(name.to_ascii_lowercase()),
            (None, Some(query)) => CatalogSource::Search(query.clone()),
            (None, None) => CatalogSource::Range(range),
        };
        AppState::new(range, timing).with_source(source)
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CardComponentId {
    Catalog,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CardContext {
    Catalog,
    Search,
    Detail,
}

impl EventRoutingState<CardComponentId, CardContext> for AppState {
    fn focused(&self) -> Option<CardComponentId> {
        self.modal().or(Some(CardComponentId::Catalog))
    }

    fn modal(&self) -> Option<CardComponentId> {
        if self.overlay_open() {
            Some(CardComponentId::Detail)
        } else if self.search.active {
            Some(CardComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CardComponentId) -> CardContext {
        match id {
            CardComponentId::Catalog => CardContext::Catalog,
            CardComponentId::Search => CardContext::Search,
            CardComponentId::Detail => CardContext::Detail,
        }
    }

    fn default_context(&self) -> CardContext {
        CardContext::Catalog
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let _guard = initialize_logging(args.log_dir.clone())?;
    info!(api_base = %args.api_base, "starting pokecards");

    let initial = args.initial_state();
    let provider: Arc<dyn EntryProvider> = Arc::new(PokeApiProvider::new(args.api_base.clone()));
    let debug = DebugSession::new(args.debug);

    let mut state = debug
        .load_state_or_else_async(|| {
            let initial = initial.clone();
            async move { Ok::<AppState, io::Error>(initial) }
        })
        .await
        .map_err(debug_error)?;
    if let Ok(size) = crossterm::terminal::size() {
        state.terminal_size = size;
    }
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, provider).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    info!("pokecards exited");
    Ok(())
}

/// Logs go to a daily file since the terminal belongs to the UI.
fn initialize_logging(log_dir: Option<PathBuf>) -> io::Result<WorkerGuard> {
    let directory = log_dir.unwrap_or_else(|| {
        dirs_next::data_local_dir().map_or_else(
            || PathBuf::from("logs"),
            |path| path.join("pokecards").join("logs"),
        )
    });
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "pokecards.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(guard)
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct CardsUi {
    catalog: CatalogView,
    search: SearchBar,
    detail: DetailOverlay,
    icons: TypeIconRegistry,
}

impl CardsUi {
    fn new() -> Self {
        Self {
            catalog: CatalogView::new(),
            search: SearchBar,
            detail: DetailOverlay::new(),
            icons: TypeIconRegistry::builtin(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CardComponentId>,
    ) {
        event_ctx.set_component_area(CardComponentId::Catalog, area);
        let props = CatalogViewProps {
            state,
            is_focused: render_ctx.is_focused() && state.modal().is_none(),
        };
        self.catalog.render(frame, area, props);

        if state.search.active {
            let [header, _, _] = catalog_layout(area);
            event_ctx.set_component_area(CardComponentId::Search, header);
            let props = SearchBarProps {
                query: &state.search.query,
                is_focused: render_ctx.is_focused(),
            };
            self.search.render(frame, header, props);
        } else {
            event_ctx.component_areas.remove(&CardComponentId::Search);
        }

        if let Some(cell) = state.overlay_cell() {
            event_ctx.set_component_area(CardComponentId::Detail, DetailOverlay::area(area));
            let props = DetailOverlayProps {
                cell,
                artwork: &state.artwork,
                icons: &self.icons,
                is_focused: render_ctx.is_focused(),
            };
            self.detail.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&CardComponentId::Detail);
        }
    }

    fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .catalog
            .handle_event(event, props)
            .into_iter()
            .collect();
        handler_response(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            query: &state.search.query,
            is_focused: true,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(cell) = state.overlay_cell() else {
            return HandlerResponse::ignored();
        };
        let props = DetailOverlayProps {
            cell,
            artwork: &state.artwork,
            icons: &self.icons,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    provider: Arc<dyn EntryProvider>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CardsUi::new()));
    let mut bus: EventBus<AppState, Action, CardComponentId, CardContext> = EventBus::new();
    let keybindings: Keybindings<CardContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(CardComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(CardComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(CardComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&provider)),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, provider: Arc<dyn EntryProvider>) {
    match effect {
        Effect::LoadCatalog { request, source } => {
            ctx.tasks().spawn(
                TaskKey::new(tasks::CATALOG_TASK),
                tasks::load_catalog(provider, request, source),
            );
        }
        Effect::FetchEntry {
            mount_id,
            identifier,
        } => {
            ctx.tasks().spawn(
                TaskKey::new(tasks::entry_task_key(mount_id)),
                tasks::fetch_entry(provider, mount_id, identifier),
            );
        }
        Effect::ScheduleReveal { mount_id, delay_ms } => {
            ctx.tasks().spawn(
                TaskKey::new(tasks::reveal_task_key(mount_id)),
                tasks::reveal_after(mount_id, delay_ms),
            );
        }
        Effect::ScheduleRevealEnd { mount_id, delay_ms } => {
            ctx.tasks().spawn(
                TaskKey::new(tasks::reveal_task_key(mount_id)),
                tasks::reveal_end_after(mount_id, delay_ms),
            );
        }
        Effect::ReleaseCell { mount_id } => {
            for key in tasks::cell_task_keys(mount_id) {
                ctx.tasks().cancel(&TaskKey::new(key));
            }
        }
        Effect::LoadArtwork { url } => {
            ctx.tasks().spawn(
                TaskKey::new(tasks::artwork_task_key(&url)),
                tasks::load_artwork(provider, url),
            );
        }
    }
}
