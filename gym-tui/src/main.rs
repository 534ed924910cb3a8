//! GymDesk - gym member management front-end
//!
//! A terminal UI over the remote member store: searchable member table,
//! add/edit modal, delete with confirmation, and a restore-from-history
//! panel. All persistence is delegated to the data service via gym-client.

mod app;
mod cache;
mod events;
mod form;
mod search;
mod ui;

use app::{App, Command};
use cache::Resource;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use events::UiEvent;
use gym_client::{ClientConfig, MemberService};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Log to a rolling file; the terminal belongs to the UI.
    std::fs::create_dir_all("logs")?;
    let file_appender = rolling::daily("logs", "gym-tui.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "starting gym-tui");
    let service = config.build_service();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let res = run_app(&mut terminal, &mut app, service, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    service: MemberService,
    tx: mpsc::UnboundedSender<UiEvent>,
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> anyhow::Result<()> {
    loop {
        spawn_stale_fetches(app, &service, &tx);
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = app.handle_key(key) {
                    dispatch(cmd, service.clone(), tx.clone());
                }
            }
        }

        while let Ok(ui_event) = rx.try_recv() {
            app.apply_event(ui_event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Refetch any cache a mutation marked stale.
fn spawn_stale_fetches(app: &mut App, service: &MemberService, tx: &mpsc::UnboundedSender<UiEvent>) {
    if app.caches.members.needs_fetch() {
        let generation = app.caches.members.begin_fetch();
        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_members().await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::MembersLoaded { generation, result });
        });
    }
    if app.caches.history.needs_fetch() {
        let generation = app.caches.history.begin_fetch();
        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = service
                .fetch_delete_history()
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::HistoryLoaded { generation, result });
        });
    }
}

/// Execute a data-access command on a background task. Each arm declares
/// which cached resources the mutation invalidates.
fn dispatch(cmd: Command, service: MemberService, tx: mpsc::UnboundedSender<UiEvent>) {
    tokio::spawn(async move {
        let ui_event = match cmd {
            Command::AddMember(payload) => {
                let result = service
                    .add_member(&payload)
                    .await
                    .map(|m| format!("{} has been added.", m.name))
                    .map_err(|e| e.to_string());
                UiEvent::MutationFinished {
                    result,
                    invalidates: &[Resource::Members],
                }
            }
            Command::UpdateMember { id, payload } => {
                let result = service
                    .update_member(id, &payload)
                    .await
                    .map(|m| format!("{} has been updated.", m.name))
                    .map_err(|e| e.to_string());
                UiEvent::MutationFinished {
                    result,
                    invalidates: &[Resource::Members],
                }
            }
            Command::DeleteMember(member) => {
                let result = service
                    .delete_member(&member)
                    .await
                    .map(|_| format!("{} has been deleted.", member.name))
                    .map_err(|e| e.to_string());
                UiEvent::MutationFinished {
                    result,
                    invalidates: &[Resource::Members, Resource::DeleteHistory],
                }
            }
            Command::RestoreMember(entry) => {
                let result = service
                    .restore_member(&entry)
                    .await
                    .map(|m| format!("{} has been restored.", m.name))
                    .map_err(|e| e.to_string());
                UiEvent::MutationFinished {
                    result,
                    invalidates: &[Resource::Members, Resource::DeleteHistory],
                }
            }
        };
        let _ = tx.send(ui_event);
    });
}
