use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// An account holder: either a learner driver or a supervising companion.
///
/// Role-conditional fields: a companion carries `license_number` and
/// `license_date`; a learner carries `logbook_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub role: UserRole,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Learner,
    Companion,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Learner => "learner",
            UserRole::Companion => "companion",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learner" => Ok(UserRole::Learner),
            "companion" => Ok(UserRole::Companion),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// Payload for account creation; the password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub role: UserRole,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub license_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub logbook_number: Option<String>,
}

/// A learner/companion pairing recorded by the school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionLink {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub companion_id: Uuid,
    /// Free-form relationship label ("parent", "instructor", ...).
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompanionLink {
    pub learner_id: Uuid,
    pub companion_id: Uuid,
    pub relation: String,
}
