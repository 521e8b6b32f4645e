use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::support::errors::{DomainError, DomainResult};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

const PASSWORD_POLICY_MESSAGE: &str =
    "Password must have at least 6 characters, 1 uppercase letter and 1 symbol (@, -, etc)";

/// Fields in the order their errors are reported
const FIELD_PRECEDENCE: [&str; 4] = ["dni", "email", "phone", "password"];

/// Self-service sign-up request
#[derive(Debug, Clone, Validate)]
pub struct RegisterUserDto {
    #[validate(contains(pattern = "@", message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Invalid DNI"))]
    pub dni: String,
    #[validate(custom(function = "password_policy"))]
    pub password: String,
}

impl RegisterUserDto {
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        dni: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            phone: phone.into(),
            dni: dni.into(),
            password: password.into(),
        }
    }

    /// Trim every field and lowercase the email. The password is kept verbatim.
    pub fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            dni: self.dni.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Run the field rules and report the first failure, dni first.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        Validate::validate(self).map_err(first_failure)
    }
}

/// At least 6 characters, one uppercase letter and one non-alphanumeric symbol.
fn password_policy(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_upper && has_symbol {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_policy");
        err.message = Some(Cow::Borrowed(PASSWORD_POLICY_MESSAGE));
        Err(err)
    }
}

fn first_failure(errors: ValidationErrors) -> DomainError {
    let fields = errors.field_errors();
    let message = FIELD_PRECEDENCE
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string());
    DomainError::Validation(message)
}
