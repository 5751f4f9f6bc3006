use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rovel_domain::ticket::Ticket;
use rovel_store::app_config::EmailConfig;
use std::path::Path;

/// Outbound mail: SMTP relay in production, a drop directory in development.
pub struct EmailService {
    transport: EmailTransport,
    from_email: String,
    from_name: String,
}

enum EmailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("email configuration invalid: {0}")]
    Config(String),

    #[error("email construction failed: {0}")]
    Build(String),

    #[error("email transmission failed: {0}")]
    Send(String),
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, DeliveryError> {
        let transport = if let Some(smtp) = &config.smtp {
            if !smtp.use_tls {
                tracing::warn!("SMTP TLS is disabled - this is not recommended for production");
            }

            let builder = if smtp.use_tls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                    .map_err(|e| DeliveryError::Config(e.to_string()))?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
            }
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ));

            EmailTransport::Smtp(builder.build())
        } else if let Some(file) = &config.file {
            let dir = Path::new(&file.path);
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| DeliveryError::Config(e.to_string()))?;
            }
            EmailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(dir))
        } else {
            return Err(DeliveryError::Config(
                "no email transport configured (expected [email.smtp] or [email.file])"
                    .to_string(),
            ));
        };

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Send the rendered ticket to the passenger: HTML summary body plus the
    /// PDF as an attachment.
    pub async fn send_ticket(&self, ticket: &Ticket, pdf: Vec<u8>) -> Result<(), DeliveryError> {
        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::Build(e.to_string()))?;

        let to = format!("{} <{}>", ticket.name, ticket.email)
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::Build(e.to_string()))?;

        let body = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(ticket_email_body(ticket));

        let attachment = Attachment::new("ticket.pdf".to_string()).body(
            pdf,
            ContentType::parse("application/pdf")
                .map_err(|e| DeliveryError::Build(e.to_string()))?,
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Votre ticket de réservation")
            .multipart(MultiPart::mixed().singlepart(body).singlepart(attachment))
            .map_err(|e| DeliveryError::Build(e.to_string()))?;

        match &self.transport {
            EmailTransport::Smtp(smtp) => {
                smtp.send(message)
                    .await
                    .map_err(|e| DeliveryError::Send(e.to_string()))?;
            }
            EmailTransport::File(file) => {
                file.send(message)
                    .await
                    .map_err(|e| DeliveryError::Send(e.to_string()))?;
            }
        }

        Ok(())
    }
}

fn ticket_email_body(ticket: &Ticket) -> String {
    format!(
        r#"<p>Cher(e) {name}, merci pour votre réservation via Rovel Reservation.</p>
<p>Voici les détails de votre réservation :</p>
<ul>
  <li><strong>Agence :</strong> {agency}</li>
  <li><strong>Mode :</strong> {mode}</li>
  <li><strong>De :</strong> {from} &rarr; <strong>À :</strong> {to}</li>
  <li><strong>Date :</strong> {date} à {time}</li>
  <li><strong>Classe :</strong> {class}</li>
  <li><strong>Montant :</strong> {amount:.2} FCFA</li>
</ul>
<p>Votre ticket est joint en PDF.</p>"#,
        name = ticket.name,
        agency = ticket.agency,
        mode = ticket.mode.as_str(),
        from = ticket.from_location,
        to = ticket.to_location,
        date = ticket.date,
        time = ticket.departure_time,
        class = ticket.class,
        amount = ticket.total_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rovel_domain::ticket::TransportMode;
    use rovel_store::app_config::FileTransportConfig;
    use uuid::Uuid;

    fn ticket() -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            agency: "Voyage Rapide".to_string(),
            mode: TransportMode::BUS,
            name: "Jean Dupont".to_string(),
            email: "jean@x.com".to_string(),
            date: "2025-06-25".to_string(),
            departure_time: "08:00".to_string(),
            total_amount: 6000.0,
            class: "Standard".to_string(),
            from_location: "DOUALA".to_string(),
            to_location: "YAOUNDE".to_string(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn file_config(dir: &std::path::Path) -> EmailConfig {
        EmailConfig {
            from_name: "Rovel Reservation".to_string(),
            from_email: "no-reply@rovel-reservation.example".to_string(),
            smtp: None,
            file: Some(FileTransportConfig {
                path: dir.to_string_lossy().into_owned(),
            }),
        }
    }

    #[test]
    fn test_body_embeds_the_ticket_fields() {
        let body = ticket_email_body(&ticket());
        assert!(body.contains("Jean Dupont"));
        assert!(body.contains("Voyage Rapide"));
        assert!(body.contains("DOUALA"));
        assert!(body.contains("YAOUNDE"));
        assert!(body.contains("6000.00 FCFA"));
    }

    #[test]
    fn test_unconfigured_transport_is_rejected() {
        let config = EmailConfig {
            from_name: "Rovel Reservation".to_string(),
            from_email: "no-reply@rovel-reservation.example".to_string(),
            smtp: None,
            file: None,
        };
        assert!(EmailService::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_file_transport_writes_the_message() {
        let dir = std::env::temp_dir().join(format!("rovel-outbox-{}", Uuid::new_v4()));
        let service = EmailService::new(&file_config(&dir)).unwrap();

        service
            .send_ticket(&ticket(), b"%PDF-1.3 fake".to_vec())
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
