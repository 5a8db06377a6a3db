use reportcard::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    tracing::info!(
        environment = %config.service.environment,
        alerts = %config.alerts.application_name,
        "Configuration loaded"
    );

    let stores = Stores::open(&config).await?;
    let app = router(AppState::new(config.clone(), stores))?;

    Server::new(config).serve(app).await
}
