use rovel_api::{
    app, ensure_bootstrap_admin,
    state::{AppState, AuthConfig},
};
use rovel_store::{app_config::Config, DbClient, TicketRepository, UserRepository};
use rovel_ticket::{EmailService, TicketIssuer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rovel_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Rovel API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let users = UserRepository::new(db.pool.clone());
    let tickets = TicketRepository::new(db.pool.clone());
    let email = EmailService::new(&config.email).expect("Failed to configure email transport");
    let issuer = TicketIssuer::new(tickets.clone(), email);

    if let Some(bootstrap) = &config.bootstrap {
        ensure_bootstrap_admin(&users, bootstrap)
            .await
            .expect("Failed to create bootstrap administrator");
    }

    let state = AppState {
        db: Arc::new(db),
        users,
        tickets,
        issuer: Arc::new(issuer),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
