use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use dogwatch::app::{App, AppOptions, View};
use dogwatch::config::{Settings, Timings};
use dogwatch::data::Dashboard;
use dogwatch::fetch::Fetcher;
use dogwatch::query::{FileStorage, LocationBar, MemoryStorage, QueryStore, Storage};
use dogwatch::source::{DatadogSource, FileSource, MonitorQuery, MonitorSource, ProxySource};
use dogwatch::{events, export, ui, Theme};

#[derive(Parser, Debug)]
#[command(name = "dogwatch")]
#[command(about = "Terminal dashboard for Datadog monitors, grouped by service")]
struct Args {
    /// Path to a TOML config file (default: <config dir>/dogwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitor proxy endpoint (serves GET <endpoint>/monitors)
    #[arg(long, conflicts_with_all = ["datadog", "file"])]
    endpoint: Option<String>,

    /// Query the Datadog API directly using DATADOG_API_KEY / DATADOG_APP_KEY
    #[arg(long, conflicts_with_all = ["endpoint", "file"])]
    datadog: bool,

    /// Read monitors from a JSON file instead of the network
    #[arg(short, long, conflicts_with_all = ["endpoint", "datadog"])]
    file: Option<PathBuf>,

    /// Initial query, as a query string or a dogwatch:// link
    #[arg(short, long, default_value = "")]
    query: String,

    /// Auto-refresh interval (e.g., "30s", "1m")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Start with auto-refresh disabled
    #[arg(long)]
    no_auto_refresh: bool,

    /// File the query is remembered in between runs
    #[arg(long, conflicts_with = "no_persist")]
    state_file: Option<PathBuf>,

    /// Do not remember the query between runs
    #[arg(long)]
    no_persist: bool,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, export the dashboard to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);
    let timings = settings.timings()?;

    init_logging(settings.log_file.as_deref(), args.export.is_some())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting dogwatch");

    let runtime = Runtime::new().context("starting async runtime")?;
    let source = build_source(&args, &settings, &timings)?;
    tracing::info!(source = source.description(), "monitor source ready");

    let store = QueryStore::new(LocationBar::new(&args.query), build_storage(&args, &settings));

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_once(&runtime, source.as_ref(), &store, &settings, export_path);
    }

    let fetcher = Fetcher::new(source, runtime.handle().clone());
    let options = AppOptions {
        prod_tag: settings.prod_tag.clone(),
        exclude_tags: settings.exclude_tags.clone(),
        refresh_interval: timings.refresh_interval,
        debounce: timings.debounce,
        auto_refresh: settings.auto_refresh,
    };

    let mut app = App::new(store, fetcher, options, Instant::now());
    app.theme = Theme::auto_detect();

    let result = run_tui(&mut app);

    // Stop in-flight requests before the runtime goes away
    app.quit();
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

/// CLI flags win over the config file and environment.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(ref endpoint) = args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(ref refresh) = args.refresh {
        settings.refresh_interval = refresh.clone();
    }
    if args.no_auto_refresh {
        settings.auto_refresh = false;
    }
    if let Some(ref path) = args.state_file {
        settings.state_file = Some(path.clone());
    }
    if let Some(ref path) = args.log_file {
        settings.log_file = Some(path.clone());
    }
}

fn init_logging(log_file: Option<&Path>, export_mode: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dogwatch=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None if export_mode => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}

fn build_source(
    args: &Args,
    settings: &Settings,
    timings: &Timings,
) -> Result<Arc<dyn MonitorSource>> {
    if let Some(ref path) = args.file {
        return Ok(Arc::new(FileSource::new(path)));
    }

    if args.datadog {
        let source = DatadogSource::new(settings.datadog_credentials(), timings.request_timeout)?;
        return Ok(Arc::new(source));
    }

    let source = ProxySource::new(&settings.endpoint, timings.request_timeout)?;
    Ok(Arc::new(source))
}

fn build_storage(args: &Args, settings: &Settings) -> Box<dyn Storage> {
    if args.no_persist {
        return Box::new(MemoryStorage::new());
    }

    match settings.state_file.clone().or_else(FileStorage::default_path) {
        Some(path) => Box::new(FileStorage::open(path)),
        None => {
            tracing::warn!("no data directory found, query will not be remembered");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Fetch the current query once and write the dashboard as JSON.
fn export_once(
    runtime: &Runtime,
    source: &dyn MonitorSource,
    store: &QueryStore,
    settings: &Settings,
    export_path: &Path,
) -> Result<()> {
    let query = store.read();
    let request = MonitorQuery::new(&query.search, &query.tags, query.only_prod, &settings.prod_tag);

    let monitors = runtime
        .block_on(source.fetch(&request))
        .with_context(|| format!("fetching monitors from {}", source.description()))?;

    let dashboard = Dashboard::build(&monitors, &query, &settings.exclude_tags);
    export::write_file(export_path, &query, &dashboard)?;

    println!(
        "Exported {} monitors to: {}",
        dashboard.filtered.len(),
        export_path.display()
    );
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 80;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(app.theme.warn));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Filter bar
                Constraint::Min(6),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);
            ui::common::render_filter_bar(frame, app, chunks[2]);

            match app.current_view {
                View::Services => ui::services::render(frame, app, chunks[3]),
                View::Board => ui::board::render(frame, app, chunks[3]),
            }

            ui::common::render_status_bar(frame, app, chunks[4]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key, Instant::now()),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Debounced input, auto-refresh and fetch completions
        app.tick(Instant::now());
    }

    Ok(())
}
