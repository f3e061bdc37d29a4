//! Process entry point for the session facade: wires up the shared
//! [`SessionStore`], a cancellable periodic sweeper, and the Axum listener.
//!
//! The sweeper runs as a `tokio` task cancelled via `tokio::select!` on
//! shutdown, rather than a detached, unjoinable thread.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use linearhash::http::{self, AppConfig};
use linearhash::session::SessionStore;

fn env_duration_secs(var: &str, default: u64) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

fn env_usize(var: &str, default: usize) -> usize {
    std::env::var(var).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Seed a handful of accounts so `/login` has something to authenticate
/// against on a fresh start.
fn seed_initial_sessions(sessions: &SessionStore) {
    for n in 0..20 {
        let email = format!("user{n}@example.com");
        let token = sessions.login(email, "changeme");
        log::debug!("seeded session {token}");
    }
}

async fn run_sweeper(sessions: SessionStore, interval: Duration, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = sessions.sweep_expired();
                if evicted > 0 {
                    log::info!("sweeper evicted {evicted} expired sessions");
                }
                log::debug!("{}", sessions.debug_dump("sessions"));
            }
            _ = shutdown.changed() => {
                log::info!("sweeper shutting down");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let ttl = env_duration_secs("SESSION_TTL_SECS", 300);
    let sweep_interval = env_duration_secs("SWEEP_INTERVAL_SECS", 300);
    let m0 = env_usize("TABLE_M0", 4);
    let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("LISTEN_ADDR must be a valid socket address");
    let static_dir = PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| ".".to_string()));

    let sessions = SessionStore::new(m0, ttl);
    seed_initial_sessions(&sessions);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sweeper = tokio::spawn(run_sweeper(sessions.clone(), sweep_interval, shutdown_rx));

    let config = AppConfig { static_dir };
    let shutdown_signal = async move {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("received shutdown signal");
    };

    http::serve(listen_addr, sessions, config, shutdown_signal).await?;

    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    Ok(())
}
