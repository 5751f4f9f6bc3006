pub mod ticket;
pub mod user;
pub mod validate;

pub use ticket::{Amount, NewTicket, ReservationStat, Ticket, TicketDraft, TransportMode};
pub use user::{Role, User};
pub use validate::FieldErrors;
