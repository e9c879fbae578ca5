use std::sync::Arc;

use vastra_api::app::build_app;
use vastra_api::config::ApiConfig;
use vastra_api::directory::{AccountDirectory, HttpAccountDirectory};
use vastra_auth::TokenAuthority;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vastra_observability::init();

    let config = ApiConfig::from_env()?;

    let authority = Arc::new(TokenAuthority::with_ttl(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ));
    let accounts: Arc<dyn AccountDirectory> =
        Arc::new(HttpAccountDirectory::new(config.account_service_url.clone()));

    let app = build_app(authority, accounts);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
