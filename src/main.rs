use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod dashboard;
mod live_feed;
mod models;
mod session;
mod stats;

use config::{Config, FeedKind};
use dashboard::AppState;
use live_feed::{start_match_monitor, HttpSnapshotFeed, MatchFeed, MockMatchFeed};
use models::{Team, TeamSide};
use session::MatchSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!(
        "{} vs {} ({} format, {} win probability)",
        config.team_a, config.team_b, config.format, config.strategy
    );

    let mut session = MatchSession::new(
        config.format,
        Team::new(config.team_a.as_str()),
        Team::new(config.team_b.as_str()),
    );
    if let Some(target) = config.target {
        session.set_target(TeamSide::B, target);
    }
    let session = session.into_shared();

    let feed: Option<Arc<dyn MatchFeed>> = match config.feed {
        FeedKind::Mock => Some(Arc::new(MockMatchFeed::new(
            config.format,
            &config.team_a,
            &config.team_b,
            config.mock_balls,
            config.target,
            config.mock_seed,
        )) as Arc<dyn MatchFeed>),
        FeedKind::Http => {
            let url = config.feed_url.as_deref().unwrap_or_default();
            Some(Arc::new(HttpSnapshotFeed::new(url)?) as Arc<dyn MatchFeed>)
        }
        FeedKind::Manual => None,
    };

    let monitor = feed.map(|feed| {
        info!("Polling feed '{}' every {}s", feed.name(), config.poll_interval_secs);
        start_match_monitor(
            feed,
            session.clone(),
            Duration::from_secs(config.poll_interval_secs),
        )
    });
    if monitor.is_none() {
        info!("Manual mode: POST /api/balls to record deliveries");
    }

    let app = dashboard::router(AppState {
        session,
        strategy: config.strategy,
        manual_entry: monitor.is_none(),
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server until Ctrl-C
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(monitor) = monitor {
        monitor.stop();
    }
    info!("Shut down");

    Ok(())
}
