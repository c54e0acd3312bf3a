#![allow(clippy::unwrap_used, clippy::expect_used)]

//! JSON API end to end: bearer auth, profile upsert, public cards and the
//! send-card endpoint against a mocked email provider.

mod common;

use axum::http::StatusCode;
use business_card::infra::storage::entity;
use common::{get, harness, json_request, profile_body, send, token};
use httpmock::prelude::*;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn profile_requires_a_token() {
    let h = harness().await;
    let reply = send(&h.router, get("/api/profile", None)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(
        &h.router,
        json_request("PUT", "/api/profile", Some("not-a-jwt"), &profile_body()),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn saved_profile_round_trips_to_the_public_card() {
    let h = harness().await;
    let user = Uuid::new_v4();
    let bearer = token(user);

    let reply = send(
        &h.router,
        json_request("PUT", "/api/profile", Some(&bearer), &profile_body()),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let saved = reply.json();
    assert_eq!(saved["website"], "https://ada.dev");
    assert_eq!(saved["socialLinks"]["linkedin"], "https://linkedin.com/in/ada");
    assert_eq!(saved["cardUrl"], format!("{}/card/{user}", common::ORIGIN));

    let card = send(&h.router, get(&format!("/api/cards/{user}"), None))
        .await
        .json();
    assert_eq!(card["fullName"], "Ada Lovelace");
    assert_eq!(card["title"], "Engineer");
    assert_eq!(card["company"], "Analytical Engines");
    assert_eq!(card["email"], "ada@example.com");
    assert_eq!(card["mobile"], "0912345678");
    assert!(card.get("bio").is_none(), "placeholder bio must be hidden");
    let platforms: Vec<&str> = card["socialLinks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["platform"].as_str().unwrap())
        .collect();
    assert_eq!(platforms, vec!["linkedin", "x"]);

    // The stored row keeps the placeholder
    let own = send(&h.router, get("/api/profile", Some(&bearer))).await.json();
    assert_eq!(own["bio"], "n/a");
}

#[tokio::test]
async fn resubmitting_replaces_the_row_and_clears_deselected_links() {
    let h = harness().await;
    let user = Uuid::new_v4();
    let bearer = token(user);

    send(
        &h.router,
        json_request("PUT", "/api/profile", Some(&bearer), &profile_body()),
    )
    .await;

    let mut body = profile_body();
    body["socialLinks"] = json!({ "x": "x.com/ada" });
    body["title"] = json!("Principal Engineer");
    let reply = send(
        &h.router,
        json_request("PUT", "/api/profile", Some(&bearer), &body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let rows = entity::Entity::find().count(&h.db).await.unwrap();
    assert_eq!(rows, 1);
    let row = entity::Entity::find_by_id(user)
        .one(&h.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.linkedin_url, None);
    assert_eq!(row.x_url.as_deref(), Some("https://x.com/ada"));
    assert_eq!(row.title, "Principal Engineer");
}

#[tokio::test]
async fn long_bio_is_rejected_as_problem() {
    let h = harness().await;
    let mut body = profile_body();
    body["bio"] = json!("b".repeat(151));
    let reply = send(
        &h.router,
        json_request("PUT", "/api/profile", Some(&token(Uuid::new_v4())), &body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.headers["content-type"],
        cardkit::problem::APPLICATION_PROBLEM_JSON
    );
    let problem = reply.json();
    assert_eq!(problem["errors"][0]["field"], "bio");
    assert_eq!(
        entity::Entity::find().count(&h.db).await.unwrap(),
        0,
        "nothing stored on validation failure"
    );
}

#[tokio::test]
async fn unknown_card_is_not_found() {
    let h = harness().await;
    let reply = send(&h.router, get(&format!("/api/cards/{}", Uuid::new_v4()), None)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.json()["code"], "BUSINESS_CARD_NOT_FOUND");
}

#[tokio::test]
async fn send_card_delivers_through_email_api() {
    let h = harness().await;
    let mock = h
        .email
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test")
                .body_includes("bob@example.com")
                .body_includes("Ada shared their digital business card with you");
            then.status(200).json_body(json!({ "id": "msg_123" }));
        })
        .await;

    let reply = send(
        &h.router,
        json_request(
            "POST",
            "/api/send-card",
            None,
            &json!({
                "recipientEmail": "bob@example.com",
                "senderName": "Ada",
                "cardUrl": "https://cards.example.com/card/1"
            }),
        ),
    )
    .await;
    mock.assert_async().await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["emailId"], "msg_123");
}

#[tokio::test]
async fn send_card_validates_before_delivery() {
    let h = harness().await;
    let mock = h
        .email
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(200).json_body(json!({ "id": "never" }));
        })
        .await;

    let complete = json!({
        "recipientEmail": "bob@example.com",
        "senderName": "Ada",
        "cardUrl": "https://cards.example.com/card/1"
    });
    for missing in ["recipientEmail", "senderName", "cardUrl"] {
        let mut body = complete.clone();
        body.as_object_mut().unwrap().remove(missing);
        let reply = send(&h.router, json_request("POST", "/api/send-card", None, &body)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{missing}");
        assert_eq!(reply.json()["success"], false);
    }

    let mut body = complete;
    body["recipientEmail"] = json!("not-an-email");
    let reply = send(&h.router, json_request("POST", "/api/send-card", None, &body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn provider_failure_is_a_server_error() {
    let h = harness().await;
    h.email
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).json_body(json!({ "message": "domain not verified" }));
        })
        .await;

    let reply = send(
        &h.router,
        json_request(
            "POST",
            "/api/send-card",
            None,
            &json!({
                "recipientEmail": "bob@example.com",
                "senderName": "Ada",
                "cardUrl": "https://cards.example.com/card/1"
            }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["message"], "Failed to send email");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let h = harness().await;
    let doc = send(&h.router, get("/api/openapi.json", None)).await.json();
    assert!(doc["paths"]["/api/send-card"]["post"].is_object());
}
