use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petcare_marketplace::{
    app::build_app,
    config::AppConfig,
    db::{create_pool, run_migrations},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,petcare_marketplace=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tokio::fs::create_dir_all(&config.media_root).await?;
    tracing::info!(media_root = %config.media_root.display(), "media directory ready");

    let app = build_app(AppState::new(pool, config));

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
