//! Terminal UI for tnkb that checks Indonesian plate numbers and browses registration regions.
//!
//! With plate numbers on the command line the plates are checked in one batch
//! and printed as JSON lines (or `--summary` lines) instead.

mod app;
mod input;
mod ui;

use std::{env, fs::File, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Env, Target};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use tnkb_core::service::TnkbService;
use tnkb_provider_rapidapi::RapidApiConfig;

use crate::app::App;
use crate::input::Action;

const LOG_FILE: &str = "tnkb-tui.log";

/// Check Indonesian vehicle registration plates.
///
/// Without plate arguments the interactive terminal UI starts.
#[derive(Debug, Parser)]
#[command(name = "tnkb-tui", version, about)]
struct Options {
    /// Decode plates locally without calling the remote API
    #[arg(long)]
    offline: bool,

    /// Print one summary line per plate instead of JSON
    #[arg(long)]
    summary: bool,

    /// Plate numbers to check in batch mode
    plates: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::parse();
    let batch = !options.plates.is_empty();
    init_logging(batch)?;

    let service = Arc::new(build_service(options.offline)?);

    if batch {
        return run_batch(&service, &options).await;
    }

    // App state
    let app = App::new(service, options.offline);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Batch mode logs to stderr; the interactive UI logs to a file so the screen stays intact.
fn init_logging(batch: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if !batch {
        let file = File::create(env::temp_dir().join(LOG_FILE))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn build_service(offline: bool) -> Result<TnkbService> {
    if offline {
        info!("Starting in offline mode");
        return Ok(TnkbService::offline());
    }
    let config = RapidApiConfig::from_env()?;
    info!("Using lookup endpoint {}", config.check_url()?);
    Ok(tnkb_provider_rapidapi::service(config)?)
}

#[expect(clippy::print_stdout, reason = "batch mode writes its results to stdout")]
async fn run_batch(service: &TnkbService, options: &Options) -> Result<()> {
    let results = service.bulk_check(&options.plates).await;
    for info in &results {
        if options.summary {
            println!("{}", ui::summary_line(info));
        } else {
            println!("{}", serde_json::to_string(&info.to_json())?);
        }
    }
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::CheckPlate => {
                    let plate = app.plate_input.trim().to_owned();
                    if plate.is_empty() {
                        app.error_message = Some("Type a plate number first".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.check_plate(&plate).await;

                    app.is_loading = false;
                    match res {
                        Ok(info) => {
                            app.push_result(info);
                            app.plate_input.clear();
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Check failed: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
