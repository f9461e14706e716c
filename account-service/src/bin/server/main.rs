use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::ports::AuthServicePort;
use account_service::domain::account::service::AuthService;
use account_service::domain::account::tokens::TokenService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::mail::SmtpMailNotifier;
use account_service::outbound::repositories::PostgresRefreshTokenRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::TokenPairIssuer;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        api_url = %config.app.api_url,
        client_url = %config.app.client_url,
        smtp_host = %config.smtp.host,
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_days = config.jwt.refresh_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));
    let mailer = Arc::new(SmtpMailNotifier::new(&config)?);

    let token_service = TokenService::new(
        TokenPairIssuer::new(
            config.jwt.access_secret.as_bytes(),
            config.jwt.refresh_secret.as_bytes(),
        ),
        refresh_token_repository,
        Duration::minutes(config.jwt.access_ttl_minutes),
        Duration::days(config.jwt.refresh_ttl_days),
    );

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        user_repository,
        token_service,
        mailer,
        config.app.api_url.clone(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let router = create_router(
        auth_service,
        config.app.client_url.clone(),
        config.jwt.refresh_ttl_days,
    );

    axum::serve(http_listener, router).await?;

    Ok(())
}
