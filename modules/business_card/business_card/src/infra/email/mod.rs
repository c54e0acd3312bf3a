//! Transactional email delivery.

mod resend;

pub use resend::ResendEmailSender;
