//! Emails a card link to a recipient.
//!
//! Stateless: every call validates its input, renders the invitation and
//! hands it to the email sender once. Nothing is retried or queued.

use std::sync::Arc;

use business_card_sdk::{CardInvite, EmailReceipt};
use tera::Context;
use tracing::{info, instrument, warn};

use super::error::DomainError;
use super::fields::InviteFields;
use super::intake::is_valid_email;
use super::ports::{EmailSender, OutgoingEmail};
use crate::templates::Templates;

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const INVALID_EMAIL: &str = "Invalid email address";

const INVITE_TEMPLATE: &str = "email/card_invite.html";

/// Subject line of the invitation.
#[must_use]
pub fn subject_for(sender_name: &str) -> String {
    format!("{sender_name} shared their digital business card with you")
}

pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    templates: Arc<Templates>,
    from: String,
}

impl Notifier {
    #[must_use]
    pub fn new(sender: Arc<dyn EmailSender>, templates: Arc<Templates>, from: String) -> Self {
        Self {
            sender,
            templates,
            from,
        }
    }

    /// Validate, render and deliver one invitation.
    ///
    /// # Errors
    /// `DomainError::Validation` for missing or malformed input (the sender is
    /// not called), `DomainError::Delivery` when the provider fails.
    #[instrument(skip_all)]
    pub async fn send(&self, invite: &CardInvite) -> Result<EmailReceipt, DomainError> {
        let invite = validate(invite)?;

        let mut ctx = Context::new();
        ctx.insert("sender_name", &invite.sender_name);
        ctx.insert("card_url", &invite.card_url);
        let html = self.templates.render(INVITE_TEMPLATE, &ctx)?;

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: vec![invite.recipient_email.clone()],
            subject: subject_for(&invite.sender_name),
            html,
        };

        match self.sender.send(&email).await {
            Ok(receipt) => {
                info!(email_id = %receipt.id, "card invitation sent");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "card invitation not delivered");
                Err(e.into())
            }
        }
    }
}

/// Trimmed copy of `invite`, or the first validation failure.
fn validate(invite: &CardInvite) -> Result<CardInvite, DomainError> {
    let recipient_email = invite.recipient_email.trim();
    let sender_name = invite.sender_name.trim();
    let card_url = invite.card_url.trim();

    for (field, value) in [
        (InviteFields::RECIPIENT_EMAIL, recipient_email),
        (InviteFields::SENDER_NAME, sender_name),
        (InviteFields::CARD_URL, card_url),
    ] {
        if value.is_empty() {
            return Err(DomainError::validation(field, MISSING_PARAMETERS));
        }
    }
    if !is_valid_email(recipient_email) {
        return Err(DomainError::validation(
            InviteFields::RECIPIENT_EMAIL,
            INVALID_EMAIL,
        ));
    }

    Ok(CardInvite {
        recipient_email: recipient_email.to_owned(),
        sender_name: sender_name.to_owned(),
        card_url: card_url.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::EmailError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    #[async_trait]
    impl EmailSender for RecordingSender {
        async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(EmailError::Rejected {
                    status: 422,
                    message: "domain not verified".to_owned(),
                });
            }
            Ok(EmailReceipt {
                id: "email-123".to_owned(),
            })
        }
    }

    fn notifier(sender: Arc<RecordingSender>) -> Notifier {
        Notifier::new(
            sender,
            Arc::new(Templates::load().unwrap()),
            "Digital Card <noreply@resend.dev>".to_owned(),
        )
    }

    fn invite() -> CardInvite {
        CardInvite {
            recipient_email: "bob@example.com".to_owned(),
            sender_name: "Ada Lovelace".to_owned(),
            card_url: "https://cards.example.com/card/42".to_owned(),
        }
    }

    #[tokio::test]
    async fn valid_invite_is_delivered() {
        let sender = Arc::new(RecordingSender::default());
        let receipt = notifier(sender.clone()).send(&invite()).await.unwrap();
        assert_eq!(receipt.id, "email-123");

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["bob@example.com"]);
        assert_eq!(sent[0].from, "Digital Card <noreply@resend.dev>");
        assert_eq!(
            sent[0].subject,
            "Ada Lovelace shared their digital business card with you"
        );
        assert!(sent[0].html.contains("https://cards.example.com/card/42"));
        assert!(sent[0].html.contains("View Digital Card"));
    }

    #[tokio::test]
    async fn missing_field_skips_delivery() {
        for blank in 0..3 {
            let mut inv = invite();
            match blank {
                0 => inv.recipient_email = String::new(),
                1 => inv.sender_name = "  ".to_owned(),
                _ => inv.card_url = String::new(),
            }
            let sender = Arc::new(RecordingSender::default());
            let err = notifier(sender.clone()).send(&inv).await.unwrap_err();
            assert!(
                matches!(err, DomainError::Validation { ref message, .. } if message == MISSING_PARAMETERS)
            );
            assert!(sender.sent.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn malformed_recipient_rejected() {
        let mut inv = invite();
        inv.recipient_email = "not-an-email".to_owned();
        let sender = Arc::new(RecordingSender::default());
        let err = notifier(sender.clone()).send(&inv).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref message, .. } if message == INVALID_EMAIL));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sender_name_is_escaped() {
        let mut inv = invite();
        inv.sender_name = "<script>x</script>".to_owned();
        let sender = Arc::new(RecordingSender::default());
        notifier(sender.clone()).send(&inv).await.unwrap();
        let html = &sender.sent.lock().unwrap()[0].html;
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn delivery_failure_surfaces() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..RecordingSender::default()
        });
        let err = notifier(sender).send(&invite()).await.unwrap_err();
        assert!(matches!(err, DomainError::Delivery(_)));
    }
}
