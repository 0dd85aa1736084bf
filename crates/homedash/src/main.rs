use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dash_client::{
    GitLabClient, HttpFetcher, IpGeolocator, OpenMeteoClient, RestGitLabClient,
};
use dash_config::{DashboardConfig, Preferences};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use tokio::runtime::Runtime;

mod actions;
mod capabilities;
mod commands;
mod dispatcher;
mod domain_models;
mod logger;
mod middleware;
mod reducers;
mod state;
mod store;
mod task;
mod theme;
mod utils;
mod views;

use actions::{Action, GlobalAction};
use middleware::{
    browser_middleware::BrowserMiddleware, command_palette_middleware::CommandPaletteMiddleware,
    gitlab_middleware::GitLabMiddleware, keyboard_middleware::KeyboardMiddleware,
    logging::LoggingMiddleware, preferences_middleware::PreferencesMiddleware,
    weather_middleware::WeatherMiddleware,
};
use state::{AppState, PreferencesState};
use store::Store;

const TICK_EVERY: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let log_file = logger::init();
    log::info!("Starting homedash, logging to {:?}", log_file);

    let config = Arc::new(DashboardConfig::load());
    let preferences = Preferences::load();
    let initial_state = AppState::new(
        config.clone(),
        PreferencesState::from_store(&preferences),
        Utc::now(),
    );

    // Background network work runs here; the UI loop stays on the main thread
    let runtime = Runtime::new()?;
    let _guard = runtime.enter();
    let fetcher = HttpFetcher::new()?;

    let gitlab_client = build_gitlab_client(&fetcher, &config);
    let weather_client = Arc::new(OpenMeteoClient::new(fetcher.clone()));
    let geolocator = Arc::new(IpGeolocator::new(
        fetcher,
        Duration::from_secs(config.weather.geolocation_timeout_secs),
    ));

    let mut store = Store::new(initial_state);

    // Add middleware in order (they execute in this order)
    store.add_middleware(Box::new(LoggingMiddleware::new()));
    store.add_middleware(Box::new(KeyboardMiddleware::new()));
    store.add_middleware(Box::new(CommandPaletteMiddleware::new()));
    store.add_middleware(Box::new(PreferencesMiddleware::new(preferences)));
    store.add_middleware(Box::new(BrowserMiddleware::new(runtime.handle().clone())));
    store.add_middleware(Box::new(GitLabMiddleware::new(
        runtime.handle().clone(),
        gitlab_client,
    )));
    store.add_middleware(Box::new(WeatherMiddleware::new(
        runtime.handle().clone(),
        weather_client,
        geolocator,
    )));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    store.dispatch(Action::Global(GlobalAction::Start));

    let result = run_app(&mut terminal, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    // Pending fetches are aborted when the runtime drops
    log::info!("Exiting homedash");
    Ok(())
}

/// The REST client, or `None` when there is no token to authenticate with.
///
/// The middleware reports a missing token or username itself; a client that
/// fails to build for any other reason is logged and treated the same way.
fn build_gitlab_client(
    fetcher: &HttpFetcher,
    config: &DashboardConfig,
) -> Option<Arc<dyn GitLabClient>> {
    let token = config.gitlab.token.as_deref().filter(|t| !t.trim().is_empty())?;
    match RestGitLabClient::new(fetcher.clone(), config.gitlab.base(), token) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            log::error!("Failed to create GitLab client: {}", e);
            None
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut Store,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| {
            let area = frame.area();
            views::render(store.state(), area, frame);
        })?;

        // Check if we should quit
        if !store.state().running {
            break;
        }

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    store.dispatch(Action::Global(GlobalAction::KeyPressed(key)));
                }
            }
        }

        if last_tick.elapsed() >= TICK_EVERY {
            last_tick = Instant::now();
            store.dispatch(Action::Global(GlobalAction::Tick(Utc::now())));
        }

        // Results from background tasks
        store.process_pending();
    }

    Ok(())
}
