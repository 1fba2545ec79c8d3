use std::sync::LazyLock;

use regex::Regex;

use crate::{error::AppError, models::ContactInfo};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"#,
    )
    .expect("email pattern compiles")
});

// Optional leading '+', then 8-20 digits, spaces, hyphens or parentheses.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 \-()]{8,20}$").expect("phone pattern compiles"));

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn validate_contact(contact: &ContactInfo) -> Result<(), AppError> {
    require_non_empty("name", &contact.name)?;
    if !is_valid_email(&contact.email) {
        return Err(AppError::Validation("email: value is not a valid email address".into()));
    }
    if !is_valid_phone(&contact.phone) {
        return Err(AppError::Validation("phone: Invalid phone number format".into()));
    }
    Ok(())
}
