use cardkit::problem::{self, Problem};
use cardkit::ValidationViolation;

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::NotFound => problem::not_found("Card not found").with_code("BUSINESS_CARD_NOT_FOUND"),
        DomainError::Validation { field, message } => {
            problem::unprocessable(format!("Validation error on '{field}': {message}"))
                .with_code("BUSINESS_CARD_VALIDATION")
                .with_errors(vec![ValidationViolation {
                    field: field.clone(),
                    message: message.clone(),
                    code: None,
                }])
        }
        DomainError::Delivery(err) => {
            tracing::warn!(error = %err, "email delivery failed");
            problem::bad_gateway("Failed to send email").with_code("BUSINESS_CARD_DELIVERY")
        }
        DomainError::ImageStore(_)
        | DomainError::Qr(_)
        | DomainError::Render(_)
        | DomainError::Database(_) => {
            tracing::error!(error = ?e, "internal error");
            problem::internal_error("An internal error occurred").with_code("BUSINESS_CARD_INTERNAL")
        }
    };
    problem.with_instance(instance).with_current_trace()
}

/// Lets handlers use `?` on domain results.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}
