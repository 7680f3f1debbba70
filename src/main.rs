//! Application entry point for the `fusa-water-observatory` service.
//!
//! Startup sequence:
//! - Initialize structured logging/tracing
//! - Load configuration from environment variables or `.env`
//! - Build the configured data backend and perform the initial load
//! - Mount the API routes and serve them with Axum
//!
//! # Environment Variables
//! - `OBSERVATORY_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `OBSERVATORY_SPAN_EVENTS` (optional) – span event mode for tracing
//! - see [`config::load_from_env`] for the rest
use std::{env, io::IsTerminal, net::SocketAddr, sync::Arc};

use anyhow::Result;
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use fusa_water_observatory::{config, dates, routes, Store};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let backend = cfg.backend();
    tracing::info!("Loading dataset from {}", backend.describe());

    let store = Store::init(backend).await;
    let snapshot = store.snapshot().await;
    match (&snapshot.error, snapshot.data.last_update()) {
        (Some(message), _) => tracing::warn!("Initial load failed: {}", message),
        (None, Some(date)) => {
            tracing::info!("Latest reading: {}", dates::format_long_date(date))
        }
        (None, None) => tracing::info!("Dataset loaded without readings"),
    }

    let app = routes::router(Arc::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Install the global tracing subscriber.
///
/// - Colors: `FORCE_COLOR=1|true|yes` forces them on, `0|false|no` off,
///   otherwise TTY detection decides
/// - Span events from `OBSERVATORY_SPAN_EVENTS`: `full`, `enter_exit`, or
///   close-only by default
/// - Level from `RUST_LOG` when set, else `OBSERVATORY_LOG_LEVEL`
fn init_tracing() {
    // ---
    let span_events = match env::var("OBSERVATORY_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("OBSERVATORY_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=info,reqwest=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
