//! The fixed set of ticket subjects a user may pick from.

use crate::core::{AppError, AppResult};

/// Allowed ticket subjects, in the order they are offered.
pub const PREDEFINED_SUBJECTS: [&str; 4] = ["Technical Issue", "Billing Inquiry", "Feature Request", "Other"];

/// Exact, case-sensitive membership check.
pub fn is_predefined(text: &str) -> bool {
    PREDEFINED_SUBJECTS.contains(&text)
}

/// Validates a user-supplied subject against [`PREDEFINED_SUBJECTS`].
pub fn parse_subject(text: &str) -> AppResult<String> {
    if is_predefined(text) {
        Ok(text.to_string())
    } else {
        Err(AppError::Validation(format!("unknown subject: {}", text)))
    }
}
