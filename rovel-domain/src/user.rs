use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account privilege level, decided at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    AGENT,
    ADMINISTRATOR,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::AGENT => "AGENT",
            Role::ADMINISTRATOR => "ADMINISTRATOR",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGENT" => Ok(Role::AGENT),
            "ADMINISTRATOR" => Ok(Role::ADMINISTRATOR),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("AGENT".parse::<Role>().unwrap(), Role::AGENT);
        assert_eq!(
            "ADMINISTRATOR".parse::<Role>().unwrap(),
            Role::ADMINISTRATOR
        );
        assert!("Ronel Mbami".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_serialization_never_exposes_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Jean Dupont".to_string(),
            email: "jean@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::AGENT,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("jean@x.com"));
    }
}
