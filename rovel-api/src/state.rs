use rovel_store::{DbClient, TicketRepository, UserRepository};
use rovel_ticket::TicketIssuer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub users: UserRepository,
    pub tickets: TicketRepository,
    pub issuer: Arc<TicketIssuer>,
    pub auth: AuthConfig,
}
