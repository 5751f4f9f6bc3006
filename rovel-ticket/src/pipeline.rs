use rovel_domain::ticket::{NewTicket, Ticket};
use rovel_store::TicketRepository;
use tracing::{error, info};
use uuid::Uuid;

use crate::barcode::{barcode_content, render_code128};
use crate::email::EmailService;
use crate::pdf::render_ticket_pdf;
use crate::qr::{qr_payload, render_qr};

/// Orchestrates persist → encode → render → deliver for one booking.
///
/// Validation and identity resolution happen in the HTTP handler before the
/// issuer is invoked; from here on the first successful step is the database
/// insert, and nothing after it may retract the inserted row.
pub struct TicketIssuer {
    tickets: TicketRepository,
    email: EmailService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Persist,
    Encode,
    Render,
    Deliver,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Persist => "persist",
            Stage::Encode => "encode",
            Stage::Render => "render",
            Stage::Deliver => "deliver",
        }
    }
}

/// A failed issuance. `ticket_id` is set as soon as the insert committed:
/// the ticket exists even though a later stage failed, and callers must be
/// able to report that state.
#[derive(Debug, thiserror::Error)]
#[error("ticket issuance failed at {}: {message}", .stage.as_str())]
pub struct IssuanceError {
    pub stage: Stage,
    pub ticket_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug)]
pub struct IssuanceReceipt {
    pub ticket: Ticket,
}

impl TicketIssuer {
    pub fn new(tickets: TicketRepository, email: EmailService) -> Self {
        Self { tickets, email }
    }

    pub async fn issue(
        &self,
        booking: NewTicket,
        owner: Uuid,
    ) -> Result<IssuanceReceipt, IssuanceError> {
        // persist: the database is the source of truth and assigns the id
        let ticket = self
            .tickets
            .insert(&booking, owner)
            .await
            .map_err(|e| IssuanceError {
                stage: Stage::Persist,
                ticket_id: None,
                message: e.to_string(),
            })?;
        let id = ticket.id;
        info!("ticket {} persisted for agent {}", id, owner);

        // encode
        let barcode = render_code128(&barcode_content(&ticket.name))
            .map_err(|e| stage_failure(Stage::Encode, id, e))?;
        let qr = render_qr(&qr_payload(&ticket))
            .map_err(|e| stage_failure(Stage::Encode, id, e))?;

        // render
        let pdf = render_ticket_pdf(&ticket, &barcode, &qr)
            .map_err(|e| stage_failure(Stage::Render, id, e))?;

        // deliver
        self.email
            .send_ticket(&ticket, pdf)
            .await
            .map_err(|e| stage_failure(Stage::Deliver, id, e))?;

        info!("ticket {} issued and mailed to {}", id, ticket.email);
        Ok(IssuanceReceipt { ticket })
    }
}

fn stage_failure(stage: Stage, id: Uuid, err: impl std::fmt::Display) -> IssuanceError {
    error!("issuance of ticket {} failed at {}: {}", id, stage.as_str(), err);
    IssuanceError {
        stage,
        ticket_id: Some(id),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(Stage::Persist.as_str(), "persist");
        assert_eq!(Stage::Deliver.as_str(), "deliver");
    }

    #[test]
    fn test_error_display_keeps_the_ticket_id() {
        let err = IssuanceError {
            stage: Stage::Deliver,
            ticket_id: Some(Uuid::new_v4()),
            message: "relay unreachable".to_string(),
        };
        assert!(err.to_string().contains("deliver"));
        assert!(err.to_string().contains("relay unreachable"));
        assert!(err.ticket_id.is_some());
    }
}
