//! Scriptoria studio terminal application.
//!
//! Turns a short story prompt into a production package (screenplay,
//! character profiles, sound design plan, script breakdown, shot list) using
//! the studio backend, with storyboard frames per shot and document export.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! cargo run -p scriptoria -- --headless --name "Ada"
//! ```

mod app;
mod events;
mod headless;
mod logging;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use scriptoria_core::{BackendError, Client, Session, SessionConfig};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Command line options shared by both front ends.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub headless: bool,
    pub url: Option<String>,
    pub name: Option<String>,
    pub download_dir: Option<PathBuf>,
}

impl CliOptions {
    fn parse(args: &[String]) -> Self {
        let mut options = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--headless" => options.headless = true,
                "--url" => {
                    if let Some(url) = args.get(i + 1) {
                        options.url = Some(url.clone());
                        i += 1;
                    }
                }
                "--name" => {
                    if let Some(name) = args.get(i + 1) {
                        options.name = Some(name.clone());
                        i += 1;
                    }
                }
                "--download-dir" => {
                    if let Some(dir) = args.get(i + 1) {
                        options.download_dir = Some(PathBuf::from(dir));
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        options
    }

    fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::from_env();
        match &self.download_dir {
            Some(dir) => config.with_download_dir(dir.clone()),
            None => config,
        }
    }

    fn client(&self) -> Result<Client, BackendError> {
        match &self.url {
            Some(url) => Client::new(url.clone()),
            None => Client::from_env(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = CliOptions::parse(&args);

    if options.headless {
        logging::init_headless();
        return headless::run_headless(&options).await.map_err(|e| e.into());
    }

    let _log_guard = logging::init_tui();

    let client = match options.client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Set SCRIPTORIA_URL in .env or pass --url http://host:port");
            std::process::exit(1);
        }
    };
    let mut session = Session::new(Arc::new(client), options.session_config());
    session.bootstrap().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(session, options.name)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Apply completions posted by background work
        app.pump_session();

        // Render
        terminal.draw(|f| render(f, &app))?;

        // Name registration talks to the backend directly
        if let Some(name) = app.pending_name.take() {
            app.set_status("Entering the studio...");
            terminal.draw(|f| render(f, &app))?;
            app.submit_name(&name).await;
        }

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Scriptoria - story prompt to production package");
    println!();
    println!("USAGE:");
    println!("  scriptoria [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help              Show this help message");
    println!("  --headless              Run in headless mode (text-only, no TUI)");
    println!("  --url <URL>             Studio backend (default: $SCRIPTORIA_URL or http://127.0.0.1:5000)");
    println!("  --name <NAME>           Name to enter the studio with");
    println!("  --download-dir <DIR>    Where exports are saved (default: $SCRIPTORIA_DOWNLOAD_DIR)");
    println!();
    println!("ENVIRONMENT:");
    println!("  SCRIPTORIA_URL           Backend base URL");
    println!("  SCRIPTORIA_DOWNLOAD_DIR  Export directory (falls back to your Downloads folder)");
    println!("  RUST_LOG                 Log filter (TUI logs go to the data directory)");
    println!();
    println!("EXAMPLES:");
    println!("  scriptoria                                  # Interactive TUI mode");
    println!("  scriptoria --headless --name Ada            # Headless mode");
    println!("  scriptoria --url http://studio.local:5000");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("scriptoria")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_options() {
        let options = CliOptions::parse(&args(&[
            "--headless",
            "--url",
            "http://studio:5000",
            "--name",
            "Ada",
            "--download-dir",
            "/tmp/out",
        ]));
        assert!(options.headless);
        assert_eq!(options.url.as_deref(), Some("http://studio:5000"));
        assert_eq!(options.name.as_deref(), Some("Ada"));
        assert_eq!(options.download_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_parse_ignores_dangling_flag() {
        let options = CliOptions::parse(&args(&["--name"]));
        assert_eq!(options.name, None);
        assert!(!options.headless);
    }
}
