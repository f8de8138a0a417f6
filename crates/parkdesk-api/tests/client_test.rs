#![allow(clippy::unwrap_used)]
// Integration tests for the parkdesk-api client using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkdesk_api::models::{ExtendRequest, NewRegistration, PaymentRequest, WireId};
use parkdesk_api::{Client, Error, MemoryTokenStore, Session, TokenStore};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let session = Arc::new(Session::with_token(SecretString::from("tok-123")));
    let client = Client::with_client(reqwest::Client::new(), base_url, session);
    (server, client)
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": 200, "error": false, "message": "OK", "data": data })
}

fn registration(id: i64, parent: Option<i64>, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "bienSoXe": "51A-123.45",
        "soThang": 3,
        "thoiGianBatDau": "2026-01-01T00:00:00.000Z",
        "thoiGianHetHan": "2026-04-01T00:00:00.000Z",
        "soTienThanhToan": 450000,
        "trangThai": status,
        "trangThaiThanhToan": "COMPLETE",
        "lanGiaHan": if parent.is_some() { 1 } else { 0 },
        "parentId": parent,
        "ghiChu": null
    })
}

// ── Envelope & auth tests ───────────────────────────────────────────

#[tokio::test]
async fn list_unwraps_envelope_and_sends_bearer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            registration(1, None, "ACTIVE"),
            registration(2, Some(1), "EXPIRED"),
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client.list_registrations().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].parent_id, Some(WireId::Num(1)));
    assert_eq!(rows[0].status, "ACTIVE");
}

#[tokio::test]
async fn bare_payload_without_envelope_is_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 4, "hoTen": "Trần Thị B", "cccd": "001" }])),
        )
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users[0].full_name.as_deref(), Some("Trần Thị B"));
}

#[tokio::test]
async fn unauthorized_clears_session_and_store() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::with_token(SecretString::from("stale")));
    let session = Arc::new(Session::new(Arc::clone(&store) as Arc<dyn TokenStore>));
    let client = Client::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Arc::clone(&session),
    );

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "statusCode": 401, "message": "Token hết hạn" })),
        )
        .mount(&server)
        .await;

    let result = client.list_vehicles().await;
    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "Token hết hạn")
    );
    assert!(!session.is_authenticated());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn login_stores_token_in_session() {
    let server = MockServer::start().await;
    let session = Arc::new(Session::anonymous());
    let client = Client::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Arc::clone(&session),
    );

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "admin", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "accessToken": "jwt-abc",
            "user": { "id": 1, "username": "admin", "hoTen": "Quản trị" }
        }))))
        .mount(&server)
        .await;

    client
        .login("admin", &SecretString::from("s3cret"))
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(
        session.user().and_then(|u| u.full_name).as_deref(),
        Some("Quản trị")
    );
}

#[tokio::test]
async fn login_rejection_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400, "error": "Bad Request", "message": "Sai mật khẩu"
        })))
        .mount(&server)
        .await;

    let result = client.login("admin", &SecretString::from("nope")).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn business_rejection_keeps_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/7/payment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "error": true,
            "message": "Đăng ký đã được thanh toán"
        })))
        .mount(&server)
        .await;

    let err = client
        .pay_registration("7", &PaymentRequest::default())
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Đăng ký đã được thanh toán");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_transient() {
    let client = Client::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
        Arc::new(Session::anonymous()),
    );
    let err = client.list_roles().await.unwrap_err();
    assert!(err.is_transient());
}

// ── Registration endpoint tests ─────────────────────────────────────

#[tokio::test]
async fn lookup_paths_are_percent_encoded() {
    let (server, client) = setup().await;

    for (p, body) in [
        ("/dang-ky-thang/bien-so-xe/51A%20123", json!([registration(1, None, "ACTIVE")])),
        ("/dang-ky-thang/cccd/079123", json!([])),
        ("/dang-ky-thang/nhan-vien/NV01", json!([])),
        ("/dang-ky-thang/trang-thai/EXPIRED", json!([])),
        ("/dang-ky-thang/history/51A%20123", json!([])),
        ("/dang-ky-thang/5/extension-chain", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(body)))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert_eq!(client.registrations_by_plate("51A 123").await.unwrap().len(), 1);
    client.registrations_by_cccd("079123").await.unwrap();
    client.registrations_by_employee("NV01").await.unwrap();
    client.registrations_by_status("EXPIRED").await.unwrap();
    client.registration_history("51A 123").await.unwrap();
    client.extension_chain("5").await.unwrap();
}

#[tokio::test]
async fn active_lookup_maps_404_to_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/active/30A-000.01"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404, "message": "Không tìm thấy"
        })))
        .mount(&server)
        .await;

    assert!(client.active_registration("30A-000.01").await.unwrap().is_none());
}

#[tokio::test]
async fn check_active_decodes_flag() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/check-active/51A-123.45"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "isActive": true,
            "registration": registration(2, Some(1), "ACTIVE")
        }))))
        .mount(&server)
        .await;

    let check = client.check_active("51A-123.45").await.unwrap();
    assert!(check.is_active);
    assert_eq!(check.registration.map(|r| r.id), Some(WireId::Num(2)));
}

#[tokio::test]
async fn create_and_extend_send_vietnamese_keys() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dang-ky-thang"))
        .and(body_json(json!({ "bienSoXe": "51A-123.45", "soThang": 3 })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(envelope(registration(9, None, "PENDING"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/9/extend"))
        .and(body_json(json!({ "soThang": 6, "ghiChu": "gia hạn" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(envelope(registration(10, Some(9), "PENDING"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_registration(&NewRegistration {
            plate: "51A-123.45".into(),
            months: 3,
            ..NewRegistration::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, WireId::Num(9));

    let extended = client
        .extend_registration(
            "9",
            &ExtendRequest {
                months: 6,
                note: Some("gia hạn".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(extended.parent_id, Some(WireId::Num(9)));
}

#[tokio::test]
async fn update_months_uses_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/dang-ky-thang/3/update-months"))
        .and(body_json(json!({ "soThang": 2 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(registration(3, None, "PENDING"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.update_months("3", 2).await.unwrap();
}

#[tokio::test]
async fn update_expired_tolerates_missing_data() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/update-expired"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "statusCode": 200, "error": false, "message": "Đã cập nhật" })),
        )
        .mount(&server)
        .await;

    let sweep = client.update_expired().await.unwrap();
    assert_eq!(sweep.updated, 0);
}

#[tokio::test]
async fn delete_ignores_echoed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/dang-ky-thang/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "affected": 1 }))))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_registration("4").await.unwrap();
}

// ── Parking tests ───────────────────────────────────────────────────

#[tokio::test]
async fn statistics_forwards_date_range() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/parking-transactions/statistics"))
        .and(query_param("from", "2026-10-01"))
        .and(query_param("to", "2026-10-19"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "tongLuotVao": 120, "tongLuotRa": 100, "dangGui": 20, "tongDoanhThu": "1500000"
        }))))
        .mount(&server)
        .await;

    let stats = client
        .parking_statistics(
            chrono::NaiveDate::from_ymd_opt(2026, 10, 1),
            chrono::NaiveDate::from_ymd_opt(2026, 10, 19),
        )
        .await
        .unwrap();
    assert_eq!(stats.entries, 120);
    assert_eq!(stats.revenue, Some(1_500_000.0));
}
