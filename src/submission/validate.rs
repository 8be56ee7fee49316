use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

use super::fields::ContactFields;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MISSING_NAME_OR_MESSAGE: &str = "Name and message are required";
pub const MISSING_CONTACT: &str = "Either email or phone is required";
pub const INVALID_EMAIL: &str = "Invalid email format";

/// Shape check only: something, `@`, something, `.`, something.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Field-presence checks, first violation wins.
pub fn check(fields: &ContactFields) -> Result<(), AppError> {
    if fields.name.is_none() || fields.message.is_none() {
        return Err(AppError::BadRequest(MISSING_NAME_OR_MESSAGE.to_string()));
    }

    if fields.email.is_none() && fields.phone.is_none() {
        return Err(AppError::BadRequest(MISSING_CONTACT.to_string()));
    }

    if let Some(email) = &fields.email {
        if !is_valid_email(email.trim()) {
            return Err(AppError::BadRequest(INVALID_EMAIL.to_string()));
        }
    }

    Ok(())
}
