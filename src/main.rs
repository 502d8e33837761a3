//! A terminal category picker.
//!
//! Load a catalog of categories and subcategories, expand/collapse
//! categories, tick subcategories one by one or a whole category at once,
//! then submit to print the chosen keys on stdout.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler, output,
    state::{ActiveView, AppState},
};
use crate::config::{AppConfig, OutputFormat};
use crate::core::catalog::{self, Catalog};
use crate::ui::{layout::AppLayout, picker::PickerWidget, popup::HelpPopup, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Pick categories and subcategories in the terminal")]
struct Cli {
    /// Catalog file (TOML).  Defaults to the built-in `books` catalog.
    catalog: Option<PathBuf>,

    /// Use a built-in catalog (`books`, `research`, `topics`).
    #[arg(long, conflicts_with = "catalog")]
    builtin: Option<String>,

    /// Comma-separated subcategory keys to start selected.
    #[arg(long, value_delimiter = ',')]
    preselect: Vec<String>,

    /// Minimum number of selected items required to submit.
    #[arg(long)]
    min: Option<usize>,

    /// Output format for the submitted selection.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Start with every category expanded.
    #[arg(long)]
    expand_all: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

// ───────────────────────────────────────── setup ─────────────

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catpick=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // Only when RUST_LOG is set; stdout is reserved for the selection.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_catalog(cli: &Cli) -> Result<Catalog> {
    let catalog = match (&cli.catalog, &cli.builtin) {
        (Some(path), _) => Catalog::from_path(path)?,
        (None, Some(name)) => Catalog::builtin(name)?,
        (None, None) => Catalog::builtin("books")?,
    };
    Ok(catalog)
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut config = AppConfig::load();
    if let Some(min) = cli.min {
        config.min_selected = min;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    // ── build the tree ────────────────────────────────────────
    let catalog = load_catalog(&cli)?;
    let title = catalog
        .title
        .clone()
        .unwrap_or_else(|| "Select categories".to_string());
    let mut tree = catalog.into_tree().context("invalid catalog")?;
    catalog::preselect(&mut tree, cli.preselect.iter().map(String::as_str));
    if cli.expand_all {
        tree.expand_all();
    }
    let mut state = AppState::new(tree, title, config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));
    let result = run(&mut terminal, &mut state, &mut events).await;
    drop(events);

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result?;

    if !state.submitted {
        return Ok(ExitCode::FAILURE);
    }
    let text = output::render_selection(&state.tree, state.config.format)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Draw, then apply one event at a time until the user submits or quits.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            state.terminal_area = frame.area();
            let layout = AppLayout::from_area(frame.area());

            let picker_block = Block::default()
                .title(format!(" {} ", state.title))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            let picker = PickerWidget::new(&state.tree, &state.visuals).block(picker_block);
            frame.render_stateful_widget(picker, layout.picker_area, &mut state.picker_state);

            let status = match state.status_message {
                Some(ref message) => Paragraph::new(message.as_str()).style(Theme::error_style()),
                None => Paragraph::new(format!(
                    " {} selected | {}",
                    state.tree.selected_count(),
                    state.config.status_bar_hint()
                ))
                .style(Theme::status_bar_style()),
            };
            frame.render_widget(status, layout.status_area);

            if state.active_view == ActiveView::Help {
                frame.render_widget(HelpPopup { config: &state.config }, frame.area());
            }
        })?;

        let Some(event) = events.recv().await else {
            tracing::warn!("terminal event stream closed");
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(state, m),
            AppEvent::Resize(_, _) => {}
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}
