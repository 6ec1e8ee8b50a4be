// Email/password accounts with bearer-token sessions.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;

use sqlx::PgPool;

use crate::models::user::UserRow;

pub use extractor::CurrentUser;
pub use token::TokenSettings;

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Lowercases and trims, then checks for a plausible `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    valid.then_some(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_accepts_and_lowercases() {
        assert_eq!(
            normalize_email("  Ada.Lovelace@Example.COM "),
            Some("ada.lovelace@example.com".to_string())
        );
    }

    #[test]
    fn test_normalize_email_rejects_malformed() {
        for raw in ["", "ada", "@example.com", "ada@", "ada@example", "a@b@c.com", "ada@.com", "a da@x.com"] {
            assert!(normalize_email(raw).is_none(), "accepted: {raw}");
        }
    }
}
