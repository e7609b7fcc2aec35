use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = btcafe::config::Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_filter()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url.as_deref().unwrap_or("<unset>"),
        database_name = %cfg.database_name,
        bind_addr = %cfg.bind_addr,
    );

    let state = btcafe::router::CafeState::new(cfg.clone());

    // Warm the handle eagerly; a failure leaves the health route degraded
    // rather than aborting the process.
    match state.manager.connect().await {
        Ok(_) => info!("content store connected"),
        Err(e) => warn!(error = %e, "content store not available at startup"),
    }

    let manager = state.manager.clone();
    let app = btcafe::router::cafe_router(state);
    btcafe::adapter::serve(app, &cfg.bind_addr).await?;

    manager.close().await;
    Ok(())
}
