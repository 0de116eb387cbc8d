mod handlers;
mod state;

use anyhow::Context;
use common::Settings;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

const DEFAULT_LOG_FILTER: &str = "server=debug,common=debug,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // configuración: se lee una sola vez y queda en modo lectura
    let settings = Settings::from_env();
    if settings.aiproxy_token.is_none() {
        tracing::warn!("AIPROXY_TOKEN no definido: /agent y la transcripción van a fallar");
    }
    info!("directorio de datos: {}", settings.data_root.display());

    let bind_addr = settings.bind_addr.clone();
    let state = AppState::new(settings).context("no se pudo crear el cliente HTTP")?;

    // router HTTP
    let app = handlers::build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("no se pudo escuchar en {bind_addr}"))?;
    info!("servidor escuchando en {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
