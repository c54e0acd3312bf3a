#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared harness: the whole module on in-memory SQLite, with the identity
//! provider and the email API served by `httpmock`.

use std::collections::BTreeMap;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use business_card::BusinessCardModule;
use cardkit::ConfigProvider;
use cardkit_auth::Claims;
use httpmock::MockServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::ServiceExt as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-secret";
pub const ORIGIN: &str = "https://cards.example.com";

struct StaticConfig(BTreeMap<String, Value>);

impl ConfigProvider for StaticConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&Value> {
        self.0.get(module_name)
    }
}

pub struct Harness {
    pub router: Router,
    pub db: DatabaseConnection,
    pub identity: MockServer,
    pub email: MockServer,
}

pub async fn harness() -> Harness {
    let identity = MockServer::start_async().await;
    let email = MockServer::start_async().await;

    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.unwrap();
    BusinessCardModule::migrate(&db).await.unwrap();

    let config = StaticConfig(BTreeMap::from([(
        BusinessCardModule::NAME.to_owned(),
        json!({
            "config": {
                "identity": { "url": identity.base_url(), "anon_key": "anon" },
                "auth": { "jwt_secret": JWT_SECRET },
                "email": { "api_key": "re_test", "base_url": email.base_url() }
            }
        }),
    )]));
    let module = BusinessCardModule::from_config(&config, db.clone(), ORIGIN).unwrap();

    Harness {
        router: module.router(),
        db,
        identity,
        email,
    }
}

/// Access token as the identity provider would sign it.
pub fn token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        email: Some("ada@example.com".to_owned()),
        role: Some("authenticated".to_owned()),
        aud: "authenticated".to_owned(),
        exp: OffsetDateTime::now_utc().unix_timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub struct Reply {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap())
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response: Response<Body> = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("cardshare_session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn profile_body() -> Value {
    json!({
        "name": "Ada",
        "surname": "Lovelace",
        "title": "Engineer",
        "company": "Analytical Engines",
        "email": "ada@example.com",
        "mobile": "0912345678",
        "website": "ada.dev",
        "bio": "n/a",
        "socialLinks": {
            "linkedin": "linkedin.com/in/ada",
            "x": "https://x.com/ada"
        }
    })
}
