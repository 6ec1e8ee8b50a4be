use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Recruiter,
    Candidate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::Candidate => "candidate",
        }
    }

    /// Unknown stored roles fall back to candidate.
    pub fn from_db(raw: &str) -> Self {
        match raw {
            "recruiter" => Role::Recruiter,
            _ => Role::Candidate,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

impl From<UserRow> for UserPublic {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: Role::from_db(&row.role),
            is_active: row.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Recruiter).unwrap(), "\"recruiter\"");
        let role: Role = serde_json::from_str("\"candidate\"").unwrap();
        assert_eq!(role, Role::Candidate);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_user_public_drops_password_hash() {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: "pbkdf2-sha256$1$AAAA$BBBB".into(),
            full_name: Some("Ada".into()),
            role: "mystery".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let public = UserPublic::from(row);
        assert_eq!(public.role, Role::Candidate);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }
}
