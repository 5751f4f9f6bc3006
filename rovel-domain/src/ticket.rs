use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A persisted booking. Wire format keeps the camelCase keys the
/// presentation layer already consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub agency: String,
    pub mode: TransportMode,
    pub name: String,
    pub email: String,
    pub date: String,
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    pub class: String,
    #[serde(rename = "from")]
    pub from_location: String,
    #[serde(rename = "to")]
    pub to_location: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    BUS,
    TRAIN,
    AVION,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::BUS => "BUS",
            TransportMode::TRAIN => "TRAIN",
            TransportMode::AVION => "AVION",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUS" => Ok(TransportMode::BUS),
            "TRAIN" => Ok(TransportMode::TRAIN),
            "AVION" => Ok(TransportMode::AVION),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Raw booking payload as submitted by the form. Fields default to empty so
/// that a missing key surfaces as a per-field validation error rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketDraft {
    pub agency: String,
    pub mode: String,
    pub name: String,
    pub email: String,
    pub date: String,
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: Option<Amount>,
    pub class: String,
    pub from: String,
    pub to: String,
}

/// The form submits the amount either as a number or as a numeric string
/// with at most two decimal places.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

/// A booking that passed validation and is ready to persist.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub agency: String,
    pub mode: TransportMode,
    pub name: String,
    pub email: String,
    pub date: String,
    pub departure_time: String,
    pub total_amount: f64,
    pub class: String,
    pub from_location: String,
    pub to_location: String,
}

/// One row per ticket: who booked it, for whom, through which agency.
/// A flattened detail list, not a true aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationStat {
    #[serde(rename = "nomAgent")]
    pub agent_name: String,
    #[serde(rename = "nomClient")]
    pub client_name: String,
    pub agency: String,
    #[serde(rename = "ticketsIssued")]
    pub tickets_issued: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        assert_eq!("BUS".parse::<TransportMode>().unwrap(), TransportMode::BUS);
        assert_eq!(
            "AVION".parse::<TransportMode>().unwrap(),
            TransportMode::AVION
        );
        assert!("PLANE".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_draft_accepts_numeric_and_string_amounts() {
        let numeric: TicketDraft =
            serde_json::from_str(r#"{"totalAmount": 6000}"#).unwrap();
        assert!(matches!(numeric.total_amount, Some(Amount::Number(n)) if n == 6000.0));

        let text: TicketDraft =
            serde_json::from_str(r#"{"totalAmount": "7500.50"}"#).unwrap();
        assert!(matches!(text.total_amount, Some(Amount::Text(ref s)) if s == "7500.50"));
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: TicketDraft = serde_json::from_str("{}").unwrap();
        assert!(draft.agency.is_empty());
        assert!(draft.total_amount.is_none());
    }

    #[test]
    fn test_ticket_wire_format_uses_camel_case() {
        let ticket = Ticket {
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
        };

        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["departureTime"], "08:00");
        assert_eq!(json["totalAmount"], 6000.0);
        assert_eq!(json["from"], "DOUALA");
        assert_eq!(json["to"], "YAOUNDE");
        assert_eq!(json["mode"], "BUS");
    }
}
