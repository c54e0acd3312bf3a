//! In-memory doubles for the domain ports, shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use business_card_sdk::{EmailReceipt, ImageSlot, ImageUpload, Profile, ProfileDraft};
use cardkit_auth::SecurityContext;
use secrecy::SecretString;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::intake::IntakeRules;
use crate::domain::notifier::Notifier;
use crate::domain::ports::{
    EmailError, EmailSender, IdentityError, IdentityProvider, IdentitySession, ImageStore,
    ImageStoreError, OutgoingEmail, QrError, QrRenderer,
};
use crate::domain::repo::{ImageUpdate, ProfileRepository, ProfileWrite};
use crate::domain::service::{Service, ServiceConfig, ServicePorts};
use crate::templates::Templates;
use crate::web::{WebContext, WebSettings};

pub const ORIGIN: &str = "https://cards.example.com";

/// Mirrors the upsert semantics of the SQL repository.
#[derive(Default)]
pub struct MemoryRepository {
    pub rows: Mutex<HashMap<Uuid, Profile>>,
    pub writes: Mutex<Vec<ProfileWrite>>,
}

#[async_trait]
impl ProfileRepository for MemoryRepository {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert(&self, write: ProfileWrite) -> anyhow::Result<Profile> {
        self.writes.lock().unwrap().push(write.clone());
        let mut rows = self.rows.lock().unwrap();
        let previous = rows.get(&write.user_id).cloned();
        let pick = |update: ImageUpdate, old: Option<String>| match update {
            ImageUpdate::Keep => old,
            ImageUpdate::Set(v) => v,
        };
        let f = write.fields;
        let profile = Profile {
            user_id: write.user_id,
            name: f.name,
            surname: f.surname,
            title: f.title,
            company: f.company,
            email: f.email,
            mobile: f.mobile,
            website: f.website,
            bio: f.bio,
            profile_photo_url: pick(
                write.profile_photo,
                previous.as_ref().and_then(|p| p.profile_photo_url.clone()),
            ),
            company_logo_url: pick(
                write.company_logo,
                previous.as_ref().and_then(|p| p.company_logo_url.clone()),
            ),
            social_links: f.social_links,
            created_at: previous
                .as_ref()
                .map_or(OffsetDateTime::UNIX_EPOCH, |p| p.created_at),
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        rows.insert(write.user_id, profile.clone());
        Ok(profile)
    }
}

#[derive(Default)]
pub struct CountingImageStore {
    pub calls: Mutex<Vec<ImageSlot>>,
    pub pruned: Mutex<Vec<(ImageSlot, Option<String>)>>,
}

#[async_trait]
impl ImageStore for CountingImageStore {
    async fn store(
        &self,
        owner: Uuid,
        slot: ImageSlot,
        _upload: &ImageUpload,
    ) -> Result<String, ImageStoreError> {
        self.calls.lock().unwrap().push(slot);
        Ok(format!("/media/{owner}/{}", slot.as_str()))
    }

    async fn prune(
        &self,
        _owner: Uuid,
        slot: ImageSlot,
        current: Option<&str>,
    ) -> Result<(), ImageStoreError> {
        self.pruned
            .lock()
            .unwrap()
            .push((slot, current.map(ToOwned::to_owned)));
        Ok(())
    }
}

pub struct EchoQr;

impl QrRenderer for EchoQr {
    fn render_svg(&self, data: &str) -> Result<String, QrError> {
        Ok(format!("<svg data-url=\"{data}\"/>"))
    }
}

/// Records every email. With `reject` set, answers like a provider refusing
/// the message.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub reject: bool,
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, EmailError> {
        if self.reject {
            return Err(EmailError::Rejected {
                status: 422,
                message: "domain not verified".to_owned(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(EmailReceipt {
            id: "re_1".to_owned(),
        })
    }
}

/// Identity provider double. Accepts `good-password`, exchanges `good-code`.
#[derive(Default)]
pub struct FakeIdentity {
    pub calls: Mutex<Vec<String>>,
}

impl FakeIdentity {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn session() -> IdentitySession {
        IdentitySession {
            access_token: SecretString::from("issued-token"),
            expires_in: Some(3600),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        self.record(format!("sign_in:{email}"));
        if password == "good-password" {
            Ok(Self::session())
        } else {
            Err(IdentityError::Rejected("Invalid login credentials".to_owned()))
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<(), IdentityError> {
        self.record(format!("sign_up:{email}"));
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
        _code_challenge: &str,
    ) -> Result<(), IdentityError> {
        self.record(format!("reset:{email}:{redirect_to}"));
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, IdentityError> {
        if provider != "google" {
            return Err(IdentityError::UnsupportedProvider(provider.to_owned()));
        }
        Ok(format!(
            "https://id.example.com/authorize?provider={provider}&redirect_to={redirect_to}&code_challenge={code_challenge}"
        ))
    }

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<IdentitySession, IdentityError> {
        self.record(format!("exchange:{auth_code}:{code_verifier}"));
        if auth_code == "good-code" {
            Ok(Self::session())
        } else {
            Err(IdentityError::Rejected("invalid flow state".to_owned()))
        }
    }

    async fn update_password(
        &self,
        _access_token: &SecretString,
        _new_password: &str,
    ) -> Result<(), IdentityError> {
        self.record("update_password");
        Ok(())
    }

    async fn sign_out(&self, _access_token: &SecretString) -> Result<(), IdentityError> {
        self.record("sign_out");
        Ok(())
    }
}

pub struct Fixture {
    pub service: Arc<Service>,
    pub repo: Arc<MemoryRepository>,
    pub images: Arc<CountingImageStore>,
    pub sender: Arc<RecordingSender>,
}

pub fn fixture() -> Fixture {
    fixture_with_sender(RecordingSender::default())
}

pub fn fixture_with_sender(sender: RecordingSender) -> Fixture {
    let repo = Arc::new(MemoryRepository::default());
    let images = Arc::new(CountingImageStore::default());
    let sender = Arc::new(sender);
    let notifier = Notifier::new(
        sender.clone(),
        Arc::new(Templates::load().unwrap()),
        "Digital Card <noreply@resend.dev>".to_owned(),
    );
    let service = Service::new(
        repo.clone(),
        ServicePorts {
            images: images.clone(),
            qr: Arc::new(EchoQr),
            notifier,
        },
        ServiceConfig {
            public_origin: ORIGIN.to_owned(),
            intake: IntakeRules::default(),
        },
    );
    Fixture {
        service: Arc::new(service),
        repo,
        images,
        sender,
    }
}

pub fn ctx(user_id: Uuid) -> SecurityContext {
    SecurityContext::new(user_id, None, SecretString::from("token"))
}

pub fn draft() -> ProfileDraft {
    ProfileDraft {
        name: "Ada".to_owned(),
        surname: "Lovelace".to_owned(),
        title: "Engineer".to_owned(),
        company: "Analytical Engines".to_owned(),
        email: "ada@example.com".to_owned(),
        mobile: "0912345678".to_owned(),
        website: Some("ada.dev".to_owned()),
        bio: Some("n/a".to_owned()),
        ..ProfileDraft::default()
    }
}

/// Page handlers wired to the fixture's service and a fake identity provider.
pub fn web_context(fx: &Fixture) -> (Arc<WebContext>, Arc<FakeIdentity>) {
    let identity = Arc::new(FakeIdentity::default());
    let web = WebContext {
        service: fx.service.clone(),
        identity: identity.clone(),
        templates: Arc::new(Templates::load().unwrap()),
        settings: WebSettings {
            public_origin: ORIGIN.to_owned(),
            cookie_secure: false,
            session_max_age_secs: 3600,
            oauth_providers: vec!["google".to_owned(), "facebook".to_owned()],
            bio_max_chars: 150,
            upload_limit_bytes: 1024 * 1024,
        },
    };
    (Arc::new(web), identity)
}
