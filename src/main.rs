mod app;
mod components;
mod config;
mod draw;
mod handlers;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::config::{Cli, EventConfig};
use crate::handlers::Handlers;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use clap::Parser;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    better_panic::install();

    tui_logger::init_logger(cli.log_level)?;
    tui_logger::set_default_level(cli.log_level);

    let config = EventConfig::from_cli(&cli);
    info!("event {} tid={}", config.base_url, config.tid);

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(AppSettings::from_cli(&cli, &config))));
    let handlers = Handlers::default();

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(&config, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    let result = main_ui_loop(
        terminal,
        app,
        handlers,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    cleanup_terminal()?;

    result
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    handlers: Handlers,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) -> anyhow::Result<()> {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &handlers, &network_requests).await;
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &network_requests, &mut loading).await;
            }

            else => break,
        }

        let app_guard = app.lock().await;
        if app_guard.state.should_quit {
            break;
        }
        draw::draw(&mut terminal, &app_guard, loading)?;
    }
    Ok(())
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    handlers: &Handlers,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match ui_event {
        UiEvent::AppStarted => {
            send_all(network_requests, vec![NetworkRequest::CheckHealth]).await;
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, handlers, network_requests).await;
        }
        UiEvent::Resize => {}
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) {
    if let NetworkResponse::LoadingStateChanged { loading_state } = response {
        *loading = loading_state;
        return;
    }

    let mut guard = app.lock().await;
    let follow_ups = guard.on_network_response(response);
    drop(guard);
    send_all(network_requests, follow_ups).await;
}

async fn send_all(network_requests: &mpsc::Sender<NetworkRequest>, requests: Vec<NetworkRequest>) {
    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("Failed to queue request: {e}");
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let event = match tokio::task::spawn_blocking(crossterm_event::read).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                error!("Failed to read terminal event: {e}");
                continue;
            }
            Err(_) => break,
        };

        let ui_event = match event {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                Some(UiEvent::KeyPressed(key_event))
            }
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
