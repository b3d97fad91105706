use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdant_core::{Email, User};

/// An address as shown to its owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailDetail {
    pub address: String,
    pub verified: bool,
    pub primary: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

/// The account as shown to its owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSelfDetail {
    pub id: Uuid,
    pub username: String,
    pub emails: Vec<EmailDetail>,
    pub created_at: DateTime<Utc>,
}

impl From<&Email> for EmailDetail {
    fn from(email: &Email) -> Self {
        Self {
            address: email.address().to_string(),
            verified: email.verified(),
            primary: email.primary(),
            verified_at: email.verified_at(),
        }
    }
}

impl From<&User> for UserSelfDetail {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_uuid(),
            username: user.username().as_str().to_string(),
            emails: user.emails().iter().map(EmailDetail::from).collect(),
            created_at: user.created_at(),
        }
    }
}
