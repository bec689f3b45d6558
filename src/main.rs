use belassistent::{build_app_state, config::Settings, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();

    let settings = Settings::load();
    tracing::info!(bind_addr = %settings.bind_addr, tz = %settings.tz, "starting belassistent");

    let bind_addr = settings.bind_addr.clone();
    let app_state = build_app_state(settings).await?;
    let router = web::router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
