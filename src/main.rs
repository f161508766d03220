//! Main entry point for gradbox

use std::{
    io::{self, Stdout},
    panic,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use gradbox::{
    clipboard::SystemClipboard,
    color_space::Rgb,
    config::Config,
    export::{export_png, render_ansi_strip},
    input::handle_event,
    logging,
    state::AppState,
    terminal_capabilities::detect_capabilities,
    ui,
    worker::{spawn_worker, WorkerHandle},
};

/// Target frame time for 60 FPS
const FRAME_TIME_MS: u64 = 16;

/// Terminal gradient explorer
#[derive(Parser, Debug)]
#[command(name = "gradbox")]
#[command(about = "Explore two-color gradients in the terminal")]
struct CliArgs {
    /// Starting first color, e.g. #F582A8
    #[arg(long, value_parser = parse_color)]
    from: Option<Rgb>,

    /// Starting second color
    #[arg(long, value_parser = parse_color)]
    to: Option<Rgb>,

    /// Print the starting gradient and exit
    #[arg(long)]
    render_once: bool,

    /// Write the starting gradient as PNG and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Write logs to PATH
    #[arg(long = "log", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write the current configuration file and exit
    #[arg(long)]
    write_config: bool,
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    s.parse().map_err(|e| format!("Invalid color: {}", e))
}

fn main() -> Result<()> {
    // Restore the terminal before the default panic output
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let cli = CliArgs::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}; using defaults", e);
        Config::default()
    });
    if let Some(from) = cli.from {
        config.gradient.initial_from = from;
    }
    if let Some(to) = cli.to {
        config.gradient.initial_to = to;
    }
    if let Some(log_file) = cli.log_file {
        config.logging.file = Some(log_file);
    }

    if cli.write_config {
        let path = Config::config_path();
        config.save_to(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let capabilities = detect_capabilities();
    let gradient = config.gradient.initial_gradient();

    // One-shot modes never enter the TUI
    if cli.render_once {
        let width = (capabilities.size.0 as usize).clamp(8, 80);
        print!(
            "{}",
            render_ansi_strip(&gradient, width, 6, capabilities.color_support)
        );
        return Ok(());
    }
    if let Some(path) = cli.export {
        let start = Instant::now();
        export_png(&gradient, config.export.width, config.export.height, &path)?;
        println!(
            "Saved {} ({}ms)",
            path.display(),
            start.elapsed().as_millis()
        );
        return Ok(());
    }

    let worker = spawn_worker()?;

    let mut app_state = AppState::new(
        config,
        capabilities,
        worker.request_tx.clone(),
        Box::new(SystemClipboard::new()),
        Box::new(rand::rng()),
    );
    tracing::info!("session started");

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app_state, &worker);
    cleanup_terminal(terminal)?;

    worker.shutdown();
    tracing::info!(saved = app_state.gradient().saved().len(), "session ended");

    result
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - handles input, fires feedback timers, drains worker
/// responses, renders UI
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app_state: &mut AppState,
    worker: &WorkerHandle,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_TIME_MS);

    loop {
        let frame_start = Instant::now();

        terminal.draw(|frame| ui::render(frame, app_state))?;

        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;

            if let Event::Resize(width, height) = event {
                app_state.set_terminal_size(width, height);
            }

            handle_event(event, app_state)?;
        }

        app_state.tick(Instant::now());

        while let Ok(response) = worker.response_rx.try_recv() {
            app_state.handle_worker_response(response);
        }

        if app_state.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("gradbox").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_colors_and_flags() {
        let cli = parse(&["--from", "#000000", "--to", "ffffff", "--render-once"]).unwrap();
        assert_eq!(cli.from, Some(Rgb::BLACK));
        assert_eq!(cli.to, Some(Rgb::WHITE));
        assert!(cli.render_once);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_parse_paths() {
        let cli = parse(&["--export", "out.png", "--log", "gradbox.log"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out.png")));
        assert_eq!(cli.log_file, Some(PathBuf::from("gradbox.log")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["--from", "pink"]).is_err());
        assert!(parse(&["--export"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
