use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use rovel_store::app_config::BootstrapAdmin;
use rovel_store::UserRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod middleware;
pub mod password;
pub mod state;
pub mod stats;
pub mod tickets;
pub mod users;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .merge(auth::routes())
        .route("/register", post(users::register));

    let protected = Router::new()
        .merge(tickets::routes())
        .route(
            "/user",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let admin = Router::new()
        .route("/users", get(users::list_users))
        .merge(stats::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the configured initial administrator on first startup. Idempotent:
/// an existing account with the same email is left untouched.
pub async fn ensure_bootstrap_admin(
    users: &UserRepository,
    admin: &BootstrapAdmin,
) -> anyhow::Result<()> {
    if users.find_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    let hash = password::hash_password(&admin.password)?;
    users
        .create(
            &admin.name,
            &admin.email,
            &hash,
            rovel_domain::user::Role::ADMINISTRATOR,
        )
        .await?;

    tracing::info!("Bootstrap administrator {} created", admin.email);
    Ok(())
}
