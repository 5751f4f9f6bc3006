pub mod app_config;
pub mod database;
pub mod error;
pub mod ticket_repo;
pub mod user_repo;

pub use database::DbClient;
pub use error::StoreError;
pub use ticket_repo::TicketRepository;
pub use user_repo::UserRepository;
