//! Validation Utilities

use validator::ValidationErrors;

use super::error::AppError;

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let text = e.message.clone().map(|m| m.to_string()).unwrap_or_default();
                format!("{}: {}", field, text)
            })
        })
        .next()
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = -1, max = 1, message = "out of range"))]
        voice: i32,
    }

    #[test]
    fn test_first_field_error_becomes_message() {
        let errors = Sample { voice: 5 }.validate().unwrap_err();
        match validation_error(errors) {
            AppError::Validation(msg) => assert_eq!(msg, "voice: out of range"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
