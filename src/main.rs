use realworld_bdd::{run_app, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    if let Err(error) = run_app(config).await {
        tracing::error!(error = ?error, "server stopped");
        return Err(error);
    }
    Ok(())
}
