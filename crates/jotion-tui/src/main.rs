use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;

mod api;
mod app;
mod layout;
mod tree;
mod ui;

use api::ApiClient;
use app::{App, AppEvent, View};

#[derive(Parser)]
#[command(name = "jotion-tui", about = "Terminal client for Jotion")]
struct Args {
    /// Jotion server base URL
    #[arg(long, env = "JOTION_SERVER_URL", default_value = "http://localhost:3000")]
    server_url: String,

    /// Access token to use instead of the stored one
    #[arg(long, env = "JOTION_TOKEN")]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let args = Args::parse();

    let mut api = ApiClient::new(&args.server_url);
    let has_token = match args.token {
        Some(token) => {
            api.set_token(&token)?;
            true
        }
        None => api.load_token().unwrap_or(false),
    };

    let (width, height) = terminal::size()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(api, has_token, Rect::new(0, 0, width, height));
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// The terminal belongs to the UI, so logs only go to the file named by
/// `JOTION_LOG`.
fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("JOTION_LOG") else {
        return Ok(());
    };

    let file = File::create(&path).with_context(|| format!("Failed to open log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotion_tui=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    // Create event channel
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    // Spawn input handler
    let tx_input = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        Some(AppEvent::Key(key))
                    }
                    Ok(Event::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                    Ok(Event::Resize(width, height)) => Some(AppEvent::Resize(width, height)),
                    _ => None,
                };
                if let Some(event) = forwarded {
                    let _ = tx_input.send(event).await;
                }
            }
            // Tick drives layout transitions and notice expiry
            let _ = tx_input.send(AppEvent::Tick).await;
        }
    });

    // Verify token on startup if we have one
    if app.view == View::VerifyingAuth {
        let tx_verify = tx.clone();
        tokio::spawn(async move {
            let _ = tx_verify.send(AppEvent::VerifyAuth).await;
        });
    }

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = rx.recv().await {
            match event {
                AppEvent::Key(key) => {
                    if app.handle_key(key, tx.clone()).await? {
                        return Ok(());
                    }
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse, tx.clone()).await,
                AppEvent::Resize(width, height) => app.on_resize(width, height),
                AppEvent::Tick => app.on_tick(),
                AppEvent::VerifyAuth => app.verify_auth().await,
                AppEvent::DocumentCreated { parent, result } => {
                    app.on_document_created(parent, result).await;
                }
            }
        }
    }
}
