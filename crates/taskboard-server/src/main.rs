use std::net::SocketAddr;
use std::sync::Arc;

use taskboard_server::{config::Config, create_router, db, CommentService, PgCommentStore};
use taskboard_shared::StoreTimezone;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    let store = Arc::new(PgCommentStore::new(pool));
    let comments = CommentService::new(store, StoreTimezone::new(config.store_utc_offset))
        .with_cascade_scope(config.cascade_scope);
    let app = create_router(comments);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
