use crate::ticket::{Amount, NewTicket, TicketDraft, TransportMode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-field validation messages, accumulated across all failing fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Validate a booking payload against the ticket schema. On success the
/// draft is converted into a `NewTicket` ready for the issuance pipeline;
/// on failure every offending field is reported. No side effects either way.
pub fn validate_ticket(draft: &TicketDraft) -> Result<NewTicket, FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.agency.trim().is_empty() {
        errors.push("agency", "L'agence est requise.");
    }

    let mode = match draft.mode.parse::<TransportMode>() {
        Ok(mode) => Some(mode),
        Err(_) => {
            errors.push("mode", "Mode de transport invalide.");
            None
        }
    };

    if draft.name.trim().is_empty() {
        errors.push("name", "Le nom du client est requis.");
    }
    if !is_valid_email(&draft.email) {
        errors.push("email", "Format d'email invalide.");
    }
    if draft.date.trim().is_empty() {
        errors.push("date", "La date est requise.");
    }
    if draft.departure_time.trim().is_empty() {
        errors.push("departureTime", "L'heure de départ est requise.");
    }

    let total_amount = match parse_amount(draft.total_amount.as_ref()) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.push("totalAmount", message);
            None
        }
    };

    if draft.class.trim().is_empty() {
        errors.push("class", "La classe est requise.");
    }
    if draft.from.trim().is_empty() {
        errors.push("from", "Le lieu de départ est requis.");
    }
    if draft.to.trim().is_empty() {
        errors.push("to", "Le lieu d'arrivée est requis.");
    }

    let ticket = match (mode, total_amount) {
        (Some(mode), Some(total_amount)) if errors.is_empty() => NewTicket {
            agency: draft.agency.clone(),
            mode,
            name: draft.name.clone(),
            email: draft.email.clone(),
            date: draft.date.clone(),
            departure_time: draft.departure_time.clone(),
            total_amount,
            class: draft.class.clone(),
            from_location: draft.from.clone(),
            to_location: draft.to.clone(),
        },
        _ => return Err(errors),
    };

    errors.into_result(ticket)
}

/// Registration constraints: name at least 2 characters, well-formed email,
/// password at least 6 characters.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if name.trim().chars().count() < 2 {
        errors.push(
            "name",
            "Le nom est requis et doit contenir au moins 2 caractères.",
        );
    }
    if !is_valid_email(email) {
        errors.push("email", "Format d'email invalide.");
    }
    if password.chars().count() < 6 {
        errors.push(
            "password",
            "Le mot de passe doit contenir au moins 6 caractères.",
        );
    }

    errors.into_result(())
}

/// Profile update: same name/email rules; the password is optional and only
/// checked when a replacement is supplied.
pub fn validate_user_update(
    name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if name.trim().chars().count() < 2 {
        errors.push(
            "name",
            "Le nom est requis et doit contenir au moins 2 caractères.",
        );
    }
    if !is_valid_email(email) {
        errors.push("email", "Format d'email invalide.");
    }
    if let Some(password) = password {
        if password.chars().count() < 6 {
            errors.push(
                "password",
                "Le mot de passe doit contenir au moins 6 caractères.",
            );
        }
    }

    errors.into_result(())
}

fn parse_amount(amount: Option<&Amount>) -> Result<f64, &'static str> {
    const MESSAGE: &str = "Le montant total doit être un nombre positif.";

    match amount {
        None => Err(MESSAGE),
        Some(Amount::Number(n)) => {
            if n.is_finite() && *n >= 0.0 {
                Ok(*n)
            } else {
                Err(MESSAGE)
            }
        }
        Some(Amount::Text(s)) => {
            if !is_decimal_string(s) {
                return Err(MESSAGE);
            }
            s.parse::<f64>().map_err(|_| MESSAGE)
        }
    }
}

/// Digits with an optional fractional part of at most two places, the shape
/// the booking form has always submitted.
fn is_decimal_string(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let integral = parts.next().unwrap_or("");
    let fraction = parts.next();

    if integral.is_empty() || !integral.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match fraction {
        None => true,
        Some(f) => {
            !f.is_empty() && f.len() <= 2 && f.chars().all(|c| c.is_ascii_digit())
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> TicketDraft {
        TicketDraft {
            agency: "Voyage Rapide".to_string(),
            mode: "BUS".to_string(),
            name: "Jean Dupont".to_string(),
            email: "jean@x.com".to_string(),
            date: "2025-06-25".to_string(),
            departure_time: "08:00".to_string(),
            total_amount: Some(Amount::Number(6000.0)),
            class: "Standard".to_string(),
            from: "DOUALA".to_string(),
            to: "YAOUNDE".to_string(),
        }
    }

    #[test]
    fn test_valid_draft_converts() {
        let ticket = validate_ticket(&valid_draft()).unwrap();
        assert_eq!(ticket.mode, TransportMode::BUS);
        assert_eq!(ticket.total_amount, 6000.0);
        assert_eq!(ticket.from_location, "DOUALA");
    }

    #[test]
    fn test_missing_name_is_reported_per_field() {
        let mut draft = valid_draft();
        draft.name = String::new();

        let errors = validate_ticket(&draft).unwrap_err();
        assert_eq!(
            errors.0.get("name").unwrap(),
            &vec!["Le nom du client est requis.".to_string()]
        );
        assert!(!errors.0.contains_key("agency"));
    }

    #[test]
    fn test_multiple_failures_accumulate() {
        let mut draft = valid_draft();
        draft.agency = String::new();
        draft.mode = "PLANE".to_string();
        draft.email = "not-an-email".to_string();

        let errors = validate_ticket(&draft).unwrap_err();
        assert!(errors.0.contains_key("agency"));
        assert!(errors.0.contains_key("mode"));
        assert!(errors.0.contains_key("email"));
    }

    #[test]
    fn test_amount_string_coercion() {
        let mut draft = valid_draft();
        draft.total_amount = Some(Amount::Text("7500.50".to_string()));
        assert_eq!(validate_ticket(&draft).unwrap().total_amount, 7500.50);

        draft.total_amount = Some(Amount::Text("7500.505".to_string()));
        assert!(validate_ticket(&draft).is_err());

        draft.total_amount = Some(Amount::Text("12,50".to_string()));
        assert!(validate_ticket(&draft).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut draft = valid_draft();
        draft.total_amount = Some(Amount::Number(-1.0));
        let errors = validate_ticket(&draft).unwrap_err();
        assert!(errors.0.contains_key("totalAmount"));
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration("Jean Dupont", "jean@x.com", "secret1").is_ok());

        let errors =
            validate_registration("J", "jean@x.com", "12345").unwrap_err();
        assert!(errors.0.contains_key("name"));
        assert!(errors.0.contains_key("password"));
        assert!(!errors.0.contains_key("email"));
    }

    #[test]
    fn test_update_password_optional() {
        assert!(validate_user_update("Jean Dupont", "jean@x.com", None).is_ok());
        assert!(validate_user_update("Jean Dupont", "jean@x.com", Some("12345")).is_err());
        assert!(validate_user_update("Jean Dupont", "jean@x.com", Some("123456")).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("jean@x.com"));
        assert!(!is_valid_email("jean@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jean x@x.com"));
        assert!(!is_valid_email("jean"));
    }
}
