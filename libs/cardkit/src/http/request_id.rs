use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::request_id::{MakeRequestId, RequestId};

/// Request id as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRequestId(pub String);

#[must_use]
pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// Generates time-ordered UUIDv7 request ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Copies the request id header into extensions and the current span.
pub async fn push_req_id_to_extensions(mut req: Request, next: Next) -> Response {
    let rid = req
        .headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    if let Some(rid) = rid {
        tracing::Span::current().record("request_id", rid.as_str());
        req.extensions_mut().insert(XRequestId(rid));
    }

    next.run(req).await
}
