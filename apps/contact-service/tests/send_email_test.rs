//! # 連絡先メール送信エンドポイントのテスト
//!
//! `POST /api/sendEmail` を本番と同じルーター構成で呼び出し、
//! ステータスコード・レスポンスボディ・リレーへの呼び出し回数を検証する。

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use folio_contact_service::{
    app_builder::build_app,
    handler::ContactState,
    usecase::{ContactDispatcher, TemplateRenderer},
};
use folio_domain::contact::ContactProfile;
use folio_infra::{mock::MockNotificationSender, notification::NotificationSender};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_profile() -> ContactProfile {
    ContactProfile {
        display_name:  "Portfolio Owner".to_string(),
        contact_email: "owner@example.com".to_string(),
        phone:         Some("+1 555 0100".to_string()),
        headline:      "Software Developer".to_string(),
    }
}

fn app_with(sender: Option<Arc<dyn NotificationSender>>) -> Router {
    let dispatcher = ContactDispatcher::new(sender, TemplateRenderer::new().unwrap(), make_profile());
    build_app(Arc::new(ContactState { dispatcher }))
}

fn test_app(sender: &MockNotificationSender) -> Router {
    app_with(Some(Arc::new(sender.clone())))
}

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/sendEmail")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_正しい宛先なら1通送信して成功を返す() {
    let sender = MockNotificationSender::new();

    let (status, body) = call(
        test_app(&sender),
        json_request(r#"{"email":"visitor@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(sender.transport_calls(), 1);
    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "visitor@example.com");
    assert_eq!(sent[0].subject, "Contact Details:");
    assert!(sent[0].text_body.contains("Phone: +1 555 0100"));
}

#[rstest]
#[case("", json!({ "error": "Email is required" }), "空のボディ")]
#[case("{}", json!({ "error": "Email is required" }), "email なし")]
#[case(r#"{"email":""}"#, json!({ "error": "Email is required" }), "email が空文字列")]
#[case(r#"{"email":"not-an-email"}"#, json!({ "error": "Invalid email format" }), "@ なし")]
#[case(r#"{"email":"user@example"}"#, json!({ "error": "Invalid email format" }), "TLD なし")]
#[case(r#"{"email":"a..b@example.com"}"#, json!({ "error": "Invalid email format" }), "ドットの連続")]
#[case("not json", json!({ "error": "Invalid request body" }), "JSON でない")]
#[case(r#"{"email":42}"#, json!({ "error": "Invalid request body" }), "email が数値")]
#[tokio::test]
async fn test_不正な入力は400を返しリレーに接続しない(
    #[case] request_body: &str,
    #[case] expected: Value,
    #[case] _reason: &str,
) {
    let sender = MockNotificationSender::new();

    let (status, body) = call(test_app(&sender), json_request(request_body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);
    assert_eq!(sender.transport_calls(), 0);
}

#[tokio::test]
async fn test_content_typeがjsonでなければ400を返す() {
    let sender = MockNotificationSender::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/sendEmail")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"email":"visitor@example.com"}"#))
        .unwrap();

    let (status, body) = call(test_app(&sender), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid content type" }));
    assert_eq!(sender.transport_calls(), 0);
}

#[tokio::test]
async fn test_認証情報が未設定なら500を返す() {
    let (status, body) = call(
        app_with(None),
        json_request(r#"{"email":"visitor@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server configuration error" }));
}

#[tokio::test]
async fn test_リレーが認証を拒否したら500を返す() {
    let sender = MockNotificationSender::rejecting_credentials();

    let (status, body) = call(
        test_app(&sender),
        json_request(r#"{"email":"visitor@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Authentication failed. Check your email credentials." })
    );
    assert!(sender.sent_emails().is_empty());
}

#[tokio::test]
async fn test_リレーに到達できなければ500を返す() {
    let sender = MockNotificationSender::unreachable();

    let (status, body) = call(
        test_app(&sender),
        json_request(r#"{"email":"visitor@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to send email", "details": "Mail relay is unavailable" })
    );
}

#[tokio::test]
async fn test_送信失敗はリレーの詳細を返す() {
    let sender = MockNotificationSender::failing_send("550 5.1.1 mailbox unavailable");

    let (status, body) = call(
        test_app(&sender),
        json_request(r#"{"email":"visitor@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to send email", "details": "550 5.1.1 mailbox unavailable" })
    );
    assert_eq!(sender.send_calls(), 1);
}

#[tokio::test]
async fn test_リクエストごとに独立して送信する() {
    let sender = MockNotificationSender::new();
    let app = test_app(&sender);

    let (first, _) = call(app.clone(), json_request(r#"{"email":"a@example.com"}"#)).await;
    let (second, _) = call(app, json_request(r#"{"email":"b@example.com"}"#)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    let recipients: Vec<String> = sender.sent_emails().into_iter().map(|e| e.to).collect();
    assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_getは405を返す() {
    let sender = MockNotificationSender::new();

    let response = test_app(&sender)
        .oneshot(
            Request::builder()
                .uri("/api/sendEmail")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(sender.transport_calls(), 0);
}
