mod ui;

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokebox::action::Action;
use pokebox::api::{HttpPokeApi, DEFAULT_API_BASE};
use pokebox::dex::Dex;
use pokebox::effect::Effect;
use pokebox::reducer::{reducer, DETAIL_ERROR_MESSAGE};
use pokebox::state::{AppState, Screen};

#[derive(Parser, Debug)]
#[command(name = "pokebox")]
#[command(about = "Browse the PokeAPI catalog from the terminal")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, env = "POKEBOX_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Write logs to this file while the TUI is running
    #[arg(long, env = "POKEBOX_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one creature's detail card
    Show {
        name: String,
        /// Print the mapped record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print catalog names page by page
    List {
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    DexList,
    Detail,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    DexList,
    Detail,
    Search,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.search.active {
            return Some(PokeComponentId::Search);
        }
        match self.screen {
            Screen::List => Some(PokeComponentId::DexList),
            Screen::Detail => Some(PokeComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.search.active {
            Some(PokeComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::DexList => PokeContext::DexList,
            PokeComponentId::Detail => PokeContext::Detail,
            PokeComponentId::Search => PokeContext::Search,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::DexList
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let api = HttpPokeApi::new(args.api_base.as_str());

    if let Some(command) = args.command {
        init_stderr_logging();
        return run_command(command, Dex::new(api)).await;
    }

    if let Some(path) = args.log_file.as_ref() {
        init_file_logging(path)?;
    }
    tracing::info!(api_base = %args.api_base, "starting pokebox");
    let dex = Arc::new(Dex::new(api));

    let debug = DebugSession::new(args.debug);
    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
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

    let result = run_app(&mut terminal, &debug, store, replay_actions, dex).await;

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
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs only go somewhere when a file is given.
fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_command(command: Command, dex: Dex<HttpPokeApi>) -> io::Result<()> {
    match command {
        Command::Show { name, json } => {
            let detail = dex
                .resolve(&name)
                .await
                .map_err(|error| io::Error::other(format!("{DETAIL_ERROR_MESSAGE} {error}")))?;
            if json {
                let text = serde_json::to_string_pretty(detail.as_ref())
                    .map_err(|error| io::Error::other(error.to_string()))?;
                println!("{text}");
            } else {
                println!("{}", ui::describe(&detail));
            }
        }
        Command::List { pages } => {
            for _ in 0..pages {
                let names = dex
                    .next_page()
                    .await
                    .map_err(|error| io::Error::other(error.to_string()))?;
                let Some(names) = names else {
                    break;
                };
                for name in names {
                    println!("{name}");
                }
            }
            let cursor = dex.cursor();
            tracing::info!(offset = cursor.offset, has_more = cursor.has_more, "listing done");
        }
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    dex: Arc<Dex<HttpPokeApi>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(PokeComponentId::DexList, move |event, state| {
        ui_list
            .borrow_mut()
            .handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char('/') if state.screen == Screen::List => {
                HandlerResponse::action(Action::SearchStart)
            }
            KeyCode::Char('r') if state.screen == Screen::List => {
                HandlerResponse::action(Action::PageRetry)
            }
            _ => HandlerResponse::ignored(),
        },
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
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &dex),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, dex: &Arc<Dex<HttpPokeApi>>) {
    match effect {
        Effect::LoadPage { offset, limit } => {
            let dex = Arc::clone(dex);
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match dex.fetch_page(offset, limit).await {
                    Ok(page) => Action::PageDidLoad(page),
                    Err(error) => Action::PageDidError {
                        offset,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::ResolveCreature { name } => {
            let dex = Arc::clone(dex);
            let key = format!("creature_{name}");
            ctx.tasks()
                .spawn(TaskKey::new(key), resolve_action(dex, name));
        }
        Effect::PrefetchCreatures { names } => {
            for name in names {
                let dex = Arc::clone(dex);
                let key = format!("creature_{name}");
                ctx.tasks()
                    .spawn(TaskKey::new(key), resolve_action(dex, name));
            }
        }
    }
}

async fn resolve_action(dex: Arc<Dex<HttpPokeApi>>, name: String) -> Action {
    match dex.resolve(&name).await {
        Ok(detail) => Action::CreatureDidLoad {
            name,
            detail: detail.as_ref().clone(),
        },
        Err(error) => {
            tracing::warn!(name = %name, error = %error, "creature lookup failed");
            Action::CreatureDidError {
                name,
                error: error.to_string(),
            }
        }
    }
}
