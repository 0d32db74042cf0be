use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transfer_server::appointment::{IcsOutbox, Locale};
use transfer_server::cache::{CacheConfig, CachedTimetableClient};
use transfer_server::completion::CompletionClient;
use transfer_server::favourites::{FavouriteStops, FavouritesStore};
use transfer_server::timetable::{DEFAULT_BASE_URL, TimetableClient, TimetableConfig};
use transfer_server::web::{AppState, create_router};

/// Log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "transfer_server=info,tower_http=info";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

const DEFAULT_STATIC_DIR: &str = "static";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let base_url =
        std::env::var("TIMETABLE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let timeout_secs = std::env::var("TIMETABLE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| match s.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!(value = %s, error = %e, "ignoring TIMETABLE_TIMEOUT_SECS");
                None
            }
        });

    // Route and completion clients share one API configuration
    let mut config = TimetableConfig::new().with_base_url(&base_url);
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(secs);
    }
    let timetable =
        TimetableClient::new(config.clone()).expect("Failed to create timetable client");
    let completion = CompletionClient::new(config).expect("Failed to create completion client");

    let cached = CachedTimetableClient::new(timetable, completion, &CacheConfig::default());

    // Favourite stops are optional; a broken file is logged and ignored
    let favourites = match std::env::var("FAVOURITES_PATH") {
        Ok(path) => match FavouritesStore::new(&path).load() {
            Ok(stops) => {
                info!(path = %path, count = stops.stops().len(), "loaded favourite stops");
                stops
            }
            Err(e) => {
                warn!(path = %path, error = %e, "could not load favourite stops");
                FavouriteStops::default()
            }
        },
        Err(_) => FavouriteStops::default(),
    };

    let locale = std::env::var("TRANSFER_LOCALE")
        .map(|tag| Locale::detect(&tag))
        .unwrap_or_default();

    let mut state = AppState::new(cached, favourites).with_locale(locale);
    if let Ok(dir) = std::env::var("CALENDAR_OUTBOX") {
        info!(dir = %dir, "writing appointments to calendar outbox");
        state = state.with_calendar(IcsOutbox::new(dir));
    }

    let static_dir =
        std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
    let app = create_router(state, &static_dir);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address");

    info!(%addr, timetable = %base_url, locale = locale.tag(), "transfer planner listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
