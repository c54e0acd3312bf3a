use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::http::{HeaderValue, header};
use axum::response::Response;
use business_card_sdk::BusinessCardClientV1;
use cardkit::{ConfigProvider, module_config_required};
use cardkit_auth::axum_ext::session_middleware;
use cardkit_auth::{JwtValidator, TokenValidator};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use secrecy::SecretString;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::api::rest::routes;
use crate::config::{BusinessCardConfig, ImageBackend};
use crate::domain::intake::IntakeRules;
use crate::domain::local_client::LocalClient;
use crate::domain::notifier::Notifier;
use crate::domain::ports::ImageStore;
use crate::domain::service::{Service, ServiceConfig, ServicePorts};
use crate::infra::email::ResendEmailSender;
use crate::infra::identity::GoTrueIdentityProvider;
use crate::infra::images::{InlineImageStore, ObjectImageStore};
use crate::infra::qr::SvgQrRenderer;
use crate::infra::storage::SeaOrmProfileRepository;
use crate::infra::storage::migrations::Migrator;
use crate::templates::Templates;
use crate::web::{self, WebContext, WebSettings};

/// Headroom for the text fields of the multipart intake form.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Stored uploads are never rendered as documents of the app origin.
const MEDIA_CSP: &str = "default-src 'none'; sandbox";

async fn harden_media(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(MEDIA_CSP),
    );
    response
}

/// Profiles, public cards, QR codes and card sharing, wired to their
/// backing services.
pub struct BusinessCardModule {
    service: Arc<Service>,
    web: Arc<WebContext>,
    validator: Arc<dyn TokenValidator>,
    /// Directory served under a local URL prefix when images are stored as objects.
    media: Option<(String, PathBuf)>,
}

impl BusinessCardModule {
    pub const NAME: &'static str = "business_card";

    /// Build the module from `modules.business_card.config`.
    ///
    /// # Errors
    /// Fails if the config section is missing or invalid, or if an outbound
    /// client or the templates cannot be set up.
    pub fn from_config(
        provider: &dyn ConfigProvider,
        db: DatabaseConnection,
        public_origin: &str,
    ) -> anyhow::Result<Self> {
        info!("Initializing business_card module");

        let cfg: BusinessCardConfig = module_config_required(provider, Self::NAME)?;
        cfg.validate()?;
        Self::build(&cfg, db, public_origin)
    }

    fn build(
        cfg: &BusinessCardConfig,
        db: DatabaseConnection,
        public_origin: &str,
    ) -> anyhow::Result<Self> {
        let public_origin = public_origin.trim_end_matches('/').to_owned();

        let email_key: Option<SecretString> = cfg.email_api_key().cloned();
        if email_key.is_none() {
            warn!("email.api_key is not set; sending cards will fail");
        }

        let templates = Arc::new(Templates::load().context("failed to load templates")?);
        let sender = ResendEmailSender::new(&cfg.email, email_key)
            .context("failed to build the email client")?;
        let identity = GoTrueIdentityProvider::new(&cfg.identity)
            .context("failed to build the identity client")?;

        let (images, media) = match cfg.images.backend {
            ImageBackend::Inline => {
                let store: Arc<dyn ImageStore> = Arc::new(InlineImageStore);
                (store, None)
            }
            ImageBackend::Object => {
                let dir = cfg
                    .images
                    .dir
                    .clone()
                    .context("images.dir is required for the object backend")?;
                let base = cfg.images.public_base_url.trim_end_matches('/').to_owned();
                let store: Arc<dyn ImageStore> = Arc::new(ObjectImageStore::new(dir.clone(), &base));
                // Only a path prefix is served here; a full URL points at a CDN.
                let media = base.starts_with('/').then_some((base, dir));
                (store, media)
            }
        };

        let notifier = Notifier::new(Arc::new(sender), templates.clone(), cfg.email.from.clone());
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmProfileRepository::new(db)),
            ServicePorts {
                images,
                qr: Arc::new(SvgQrRenderer::new(cfg.qr)),
                notifier,
            },
            ServiceConfig {
                public_origin: public_origin.clone(),
                intake: IntakeRules {
                    bio_max_chars: cfg.intake.bio_max_chars,
                    image_max_bytes: cfg.images.max_bytes,
                },
            },
        ));

        let web = Arc::new(WebContext {
            service: service.clone(),
            identity: Arc::new(identity),
            templates,
            settings: WebSettings {
                public_origin,
                cookie_secure: cfg.auth.cookie_secure,
                session_max_age_secs: cfg.auth.session_max_age_secs,
                oauth_providers: cfg.identity.oauth_providers.clone(),
                bio_max_chars: cfg.intake.bio_max_chars,
                upload_limit_bytes: cfg.images.max_bytes * 2 + FORM_OVERHEAD_BYTES,
            },
        });

        let validator: Arc<dyn TokenValidator> = Arc::new(JwtValidator::hs256(
            &cfg.auth.jwt_secret,
            &cfg.auth.audience,
            cfg.auth.leeway_secs,
        ));

        info!(backend = ?cfg.images.backend, "business_card module initialized");
        Ok(Self {
            service,
            web,
            validator,
            media,
        })
    }

    /// Create or upgrade the `profiles` table.
    ///
    /// # Errors
    /// Returns the migration error.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running business_card database migrations");
        Migrator::up(db, None).await?;
        info!("business_card database migrations completed");
        Ok(())
    }

    /// Pages, JSON API and static assets behind the session middleware.
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = routes::register_routes(Router::new(), self.service.clone());
        router = web::routes::register_routes(router, self.web.clone());

        if let Some((prefix, dir)) = &self.media {
            info!(prefix = %prefix, dir = %dir.display(), "serving stored images");
            let media = Router::new()
                .fallback_service(ServeDir::new(dir))
                .layer(axum::middleware::map_response(harden_media));
            router = router.nest(prefix, media);
        }

        router.layer(axum::middleware::from_fn_with_state(
            self.validator.clone(),
            session_middleware,
        ))
    }

    /// In-process client for other components of the server.
    #[must_use]
    pub fn client(&self) -> Arc<dyn BusinessCardClientV1> {
        Arc::new(LocalClient::new(self.service.clone()))
    }
}
