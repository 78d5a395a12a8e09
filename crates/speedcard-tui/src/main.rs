use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use speedcard_core::config_file::{self, ConfigFile};
use speedcard_core::{
    FileBackend, PagePolicy, PersistentStore, Session, Settings, SnapshotStore,
};
use speedcard_reporting::{ExportFormat, FileExporter, PdfOptions};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Speedcard: a terminal scorecard for speed dating events.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of people on the roster
    #[arg(long)]
    roster_size: Option<usize>,

    /// Directory the roster snapshot is stored in
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory exports are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Export format: pdf, text or markdown
    #[arg(long)]
    format: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Out-of-range page requests: reject (default) or clamp
    #[arg(long)]
    page_policy: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for speedcard crates (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

/// Apply environment and CLI overrides on top of the file settings.
fn resolve_settings(args: &Args, file: &ConfigFile) -> anyhow::Result<Settings> {
    let mut settings = Settings::resolve(file);

    if let Ok(dir) = std::env::var("SPEEDCARD_DATA_DIR")
        && !dir.is_empty()
    {
        settings.data_dir = Some(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("SPEEDCARD_EXPORT_DIR")
        && !dir.is_empty()
    {
        settings.export_dir = Some(PathBuf::from(dir));
    }

    if let Some(size) = args.roster_size {
        if !(1..=config_file::MAX_ROSTER_SIZE).contains(&size) {
            anyhow::bail!(
                "roster size must be between 1 and {}",
                config_file::MAX_ROSTER_SIZE
            );
        }
        settings.roster.size = size;
    }
    if let Some(dir) = &args.data_dir {
        settings.data_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.export_dir {
        settings.export_dir = Some(dir.clone());
    }
    if let Some(format) = &args.format {
        settings.export_format = format.to_ascii_lowercase();
    }
    if let Some(theme) = &args.theme {
        settings.theme = theme.clone();
    }
    if let Some(policy) = &args.page_policy {
        settings.page_policy = PagePolicy::from_name(policy)
            .ok_or_else(|| anyhow::anyhow!("unknown page policy: {policy}"))?;
    }

    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = logging::init(args.log_level.as_deref());

    // Resolve config: CLI flags > env vars > config files > defaults
    let file = match &args.config {
        Some(path) => config_file::load_strict(path)?,
        None => config_file::load_config(),
    };
    let settings = resolve_settings(&args, &file)?;

    let export_format = ExportFormat::from_name(&settings.export_format).unwrap_or_else(|| {
        tracing::warn!(format = %settings.export_format, "unknown export format, using PDF");
        ExportFormat::Pdf
    });

    // Open persistent storage
    let data_dir = match settings.data_dir.clone().or_else(FileBackend::default_dir) {
        Some(dir) => dir,
        None => anyhow::bail!("could not determine a data directory; pass --data-dir"),
    };
    let backend = FileBackend::open(&data_dir)?;
    let store: Box<dyn PersistentStore> = Box::new(SnapshotStore::new(
        backend,
        settings.storage_key.clone(),
        settings.roster.size,
    ));
    let session = Session::open(store, &settings.roster, settings.page_policy);
    tracing::info!(
        data_dir = %data_dir.display(),
        roster = settings.roster.size,
        policy = settings.page_policy.label(),
        "session opened"
    );

    let export_dir = match settings.export_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let exporter = FileExporter::new(export_dir, settings.export_filename.clone())
        .with_format(export_format)
        .with_pdf_options(PdfOptions {
            font_path: settings.font_path.clone(),
            ..PdfOptions::default()
        });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(session, &settings.theme);
    app.large_pager = settings.large_pager;
    app.export_format = export_format;
    app.config_path = args.config.clone().or_else(config_file::config_path);

    // Background worker for exports
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    app.worker_tx = Some(cmd_tx);

    let worker = tokio::spawn(backend::run_worker(
        cmd_rx,
        event_tx,
        exporter,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(1000 / u64::from(settings.fps.max(1)));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(worker_event) = maybe_event {
                    app.handle_worker_event(worker_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_worker_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "worker did not shut down cleanly");
    }
    if let Some(path) = &app.last_export {
        println!("Last export: {}", path.display());
    }
    tracing::info!("exiting");

    Ok(())
}
