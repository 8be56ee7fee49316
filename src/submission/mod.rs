pub mod fields;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod sanitize;
pub mod validate;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

pub const EXTRA_MAX_LEN: usize = 200;

/// Optional partner-form fields, in the order every output renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraField {
    Company,
    ContactRole,
    FleetSize,
    AdjusterContact,
    Vehicle,
    Insurer,
    ClaimNumber,
    PhotoCount,
}

impl ExtraField {
    pub const ALL: [ExtraField; 8] = [
        ExtraField::Company,
        ExtraField::ContactRole,
        ExtraField::FleetSize,
        ExtraField::AdjusterContact,
        ExtraField::Vehicle,
        ExtraField::Insurer,
        ExtraField::ClaimNumber,
        ExtraField::PhotoCount,
    ];

    /// Request body key.
    pub fn key(self) -> &'static str {
        match self {
            ExtraField::Company => "company",
            ExtraField::ContactRole => "contactRole",
            ExtraField::FleetSize => "fleetSize",
            ExtraField::AdjusterContact => "adjusterContact",
            ExtraField::Vehicle => "vehicle",
            ExtraField::Insurer => "insurer",
            ExtraField::ClaimNumber => "claimNumber",
            ExtraField::PhotoCount => "photoCount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtraField::Company => "Company",
            ExtraField::ContactRole => "Role",
            ExtraField::FleetSize => "Fleet Size",
            ExtraField::AdjusterContact => "Adjuster",
            ExtraField::Vehicle => "Vehicle",
            ExtraField::Insurer => "Insurance",
            ExtraField::ClaimNumber => "Claim #",
            ExtraField::PhotoCount => "Photos",
        }
    }

    pub fn max_len(self) -> usize {
        EXTRA_MAX_LEN
    }
}

/// One validated, sanitized contact-form submission. Built per request and
/// handed to exactly one sink.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub ip: String,
    pub user_agent: String,
    /// Present optional fields only, in `ExtraField::ALL` order.
    pub extras: Vec<(ExtraField, String)>,
    pub photo_urls: Vec<String>,
}

impl Submission {
    pub fn extra(&self, field: ExtraField) -> Option<&str> {
        self.extras
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Reply-to for notifications: the submitter if their address is usable.
    pub fn reply_to<'a>(&'a self, fallback: &'a str) -> &'a str {
        if validate::is_valid_email(&self.email) {
            &self.email
        } else {
            fallback
        }
    }
}

#[cfg(test)]
pub(crate) fn sample() -> Submission {
    Submission {
        id: Uuid::now_v7(),
        timestamp: DateTime::parse_from_rfc3339("2025-03-01T14:30:00Z")
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        source: "website".into(),
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: "5551234567".into(),
        subject: "Collision Repair".into(),
        message: "Rear bumper\nneeds work".into(),
        ip: "203.0.113.9".into(),
        user_agent: "Mozilla/5.0".into(),
        extras: vec![],
        photo_urls: vec![],
    }
}
