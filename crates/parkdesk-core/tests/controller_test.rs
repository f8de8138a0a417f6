#![allow(clippy::unwrap_used)]

// Controller end-to-end against a mock backend.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkdesk_core::{
    Command, CommandResult, Controller, ControllerConfig, CoreError, CreateRegistrationRequest,
    ExtendRegistrationRequest, PaymentRequest, RecordId, RegistrationStatus, RegistrationView,
    SearchField, SearchPlan, SearchQuery, UiMode, messages,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn controller(server: &MockServer) -> Controller {
    let config = ControllerConfig::new(Url::parse(&server.uri()).unwrap())
        .with_token(SecretString::from("tok"));
    Controller::new(config).unwrap()
}

fn row(id: i64, plate: &str, status: &str, payment: &str, seq: u32, parent: Option<i64>) -> Value {
    json!({
        "id": id,
        "bienSoXe": plate,
        "soThang": 3,
        "thoiGianBatDau": "2026-01-01T00:00:00Z",
        "thoiGianHetHan": "2026-04-01T00:00:00Z",
        "trangThai": status,
        "trangThaiThanhToan": payment,
        "lanGiaHan": seq,
        "parentId": parent,
    })
}

fn envelope(data: Value) -> Value {
    json!({ "statusCode": 200, "error": false, "data": data })
}

async fn mount_chain(server: &MockServer, id: i64, rows: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/dang-ky-thang/{id}/extension-chain")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(rows)))
        .mount(server)
        .await;
}

fn mutations(requests: &[wiremock::Request]) -> usize {
    requests
        .iter()
        .filter(|r| r.method.as_str() != "GET")
        .count()
}

async fn registration(ctrl: &Controller, id: i64) -> parkdesk_core::Registration {
    ctrl.registrations()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.id == RecordId::Num(id))
        .unwrap()
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn registrations_are_converted_to_domain_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            row(1, "51A-111.11", "ACTIVE", "COMPLETE", 0, None),
            row(2, "51A-111.11", "PENDING", "PENDING", 1, Some(1)),
        ]))))
        .mount(&server)
        .await;

    let rows = controller(&server).registrations().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, RegistrationStatus::Active);
    assert_eq!(rows[1].parent_id, Some(RecordId::Num(1)));
    assert_eq!(rows[1].extension_seq, 1);
}

#[tokio::test]
async fn extend_is_offered_only_on_the_chain_tail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            row(1, "51A-111.11", "ACTIVE", "COMPLETE", 0, None),
            row(2, "51A-111.11", "EXPIRED", "COMPLETE", 1, Some(1)),
        ]))))
        .mount(&server)
        .await;

    let mut view = RegistrationView::default();
    view.begin_fetch();
    view.finish_fetch(controller(&server).registrations().await)
        .unwrap();

    let first = view.find(&RecordId::Num(1)).cloned().unwrap();
    let second = view.find(&RecordId::Num(2)).cloned().unwrap();
    assert!(!view.is_latest_in_chain(&first));
    assert!(view.is_latest_in_chain(&second));
    assert!(!view.can_extend(&first));
    assert!(view.can_extend(&second));

    assert!(view.open(UiMode::Extend(RecordId::Num(1))).is_err());
    view.open(UiMode::Extend(RecordId::Num(2))).unwrap();
}

#[tokio::test]
async fn plate_search_normalizes_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/bien-so-xe/51A-222.22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            7,
            "51A-222.22",
            "ACTIVE",
            "COMPLETE",
            0,
            None
        )]))))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new(SearchField::Plate, "  51a-222.22 ");
    let rows = controller(&server)
        .search_registrations(&query)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn search_without_matches_is_empty_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/cccd/012345678901"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "Không tìm thấy",
            "error": "Not Found",
        })))
        .mount(&server)
        .await;

    let query = SearchQuery::new(SearchField::Cccd, "012345678901");
    let rows = controller(&server)
        .search_registrations(&query)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn unknown_status_search_is_rejected_locally() {
    let server = MockServer::start().await;
    let query = SearchQuery::new(SearchField::Status, "sleeping");
    let err = controller(&server)
        .search_registrations(&query)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_registration_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = controller(&server)
        .registration(&RecordId::Num(99))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn extension_chain_is_root_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang/3/extension-chain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            row(3, "X1", "PENDING", "PENDING", 2, Some(2)),
            row(1, "X1", "EXPIRED", "COMPLETE", 0, None),
            row(2, "X1", "ACTIVE", "COMPLETE", 1, Some(1)),
        ]))))
        .mount(&server)
        .await;

    let chain = controller(&server)
        .extension_chain(&RecordId::Num(3))
        .await
        .unwrap();
    let ids: Vec<_> = chain.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![RecordId::Num(1), RecordId::Num(2), RecordId::Num(3)]);
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_refetch_moves_view_to_new_row() {
    let server = MockServer::start().await;
    let mut existing: Vec<Value> = (1..=6)
        .map(|i| row(i, &format!("P{i}"), "ACTIVE", "COMPLETE", 0, None))
        .collect();
    Mock::given(method("POST"))
        .and(path("/dang-ky-thang"))
        .and(body_partial_json(json!({ "bienSoXe": "51A-777.77", "soThang": 2 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "statusCode": 201,
            "data": row(7, "51A-777.77", "PENDING", "PENDING", 0, None),
        })))
        .expect(1)
        .mount(&server)
        .await;
    existing.push(row(7, "51A-777.77", "PENDING", "PENDING", 0, None));
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Array(existing))))
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let mut view = RegistrationView::default();

    let result = ctrl
        .execute(Command::CreateRegistration(CreateRegistrationRequest {
            plate: "51a-777.77".into(),
            months: 2,
            user_id: None,
            starts_on: None,
            amount: None,
            note: None,
        }))
        .await
        .unwrap();
    let created = result.created_registration().cloned().unwrap();

    view.begin_fetch();
    view.finish_create(ctrl.registrations().await, &created)
        .unwrap();

    assert_eq!(view.pager().page(), 2);
    assert!(view.page_rows().iter().any(|r| r.id == created));
}

#[tokio::test]
async fn update_months_above_current_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            4, "Y1", "PENDING", "PENDING", 0, None
        )]))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let reg = registration(&ctrl, 4).await;
    let err = ctrl
        .execute(Command::UpdateMonths {
            registration: Box::new(reg),
            months: 5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn update_months_down_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            4, "Y1", "PENDING", "PENDING", 0, None
        )]))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/dang-ky-thang/4/update-months"))
        .and(body_partial_json(json!({ "soThang": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(row(
            4, "Y1", "PENDING", "PENDING", 0, None,
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let reg = registration(&ctrl, 4).await;
    let result = ctrl
        .execute(Command::UpdateMonths {
            registration: Box::new(reg),
            months: 1,
        })
        .await
        .unwrap();
    assert!(matches!(result, CommandResult::Registration(_)));
}

#[tokio::test]
async fn smart_extend_picks_endpoint_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            row(1, "Z1", "EXPIRED", "COMPLETE", 0, None),
            row(2, "Z2", "ACTIVE", "COMPLETE", 0, None),
        ]))))
        .mount(&server)
        .await;
    mount_chain(&server, 1, json!([row(1, "Z1", "EXPIRED", "COMPLETE", 0, None)])).await;
    mount_chain(&server, 2, json!([row(2, "Z2", "ACTIVE", "COMPLETE", 0, None)])).await;
    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/1/extend-expired"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(row(
            3,
            "Z1",
            "PENDING",
            "PENDING",
            1,
            Some(1),
        ))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/2/extend"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(row(
            4,
            "Z2",
            "PENDING",
            "PENDING",
            1,
            Some(2),
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    for id in [1, 2] {
        let reg = registration(&ctrl, id).await;
        ctrl.execute(Command::SmartExtend {
            registration: Box::new(reg),
            request: ExtendRegistrationRequest {
                months: 1,
                note: None,
            },
        })
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn cancelled_rows_cannot_be_extended() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            5, "C1", "CANCELLED", "PENDING", 0, None
        )]))))
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let reg = registration(&ctrl, 5).await;
    let mut view = RegistrationView::default();
    view.finish_fetch(Ok(vec![reg.clone()])).unwrap();
    assert!(view.open(UiMode::Extend(reg.id.clone())).is_err());

    let err = ctrl
        .execute(Command::ExtendRegistration {
            registration: Box::new(reg),
            request: ExtendRegistrationRequest {
                months: 1,
                note: None,
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn extending_a_superseded_row_never_reaches_backend() {
    let server = MockServer::start().await;
    let chain = json!([
        row(1, "W1", "ACTIVE", "COMPLETE", 0, None),
        row(2, "W1", "EXPIRED", "COMPLETE", 1, Some(1)),
    ]);
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(chain.clone())))
        .mount(&server)
        .await;
    mount_chain(&server, 1, chain).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let request = ExtendRegistrationRequest {
        months: 1,
        note: None,
    };
    let reg = registration(&ctrl, 1).await;
    for cmd in [
        Command::SmartExtend {
            registration: Box::new(reg.clone()),
            request: request.clone(),
        },
        Command::ExtendRegistration {
            registration: Box::new(reg),
            request,
        },
    ] {
        let err = ctrl.execute(cmd).await.unwrap_err();
        assert_eq!(err.user_message(), messages::NOT_EXTENDABLE);
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(mutations(&requests), 0);
}

#[tokio::test]
async fn paying_a_cancelled_row_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            5, "C1", "CANCELLED", "PENDING", 0, None
        )]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dang-ky-thang/5/payment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let reg = registration(&ctrl, 5).await;
    assert!(reg.can_pay());

    let err = ctrl
        .execute(Command::PayRegistration {
            registration: Box::new(reg),
            request: PaymentRequest::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), messages::CANCELLED_TERMINAL);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(mutations(&requests), 0);
}

#[tokio::test]
async fn cancel_sends_cancelled_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dang-ky-thang/8"))
        .and(body_partial_json(json!({ "trangThai": "CANCELLED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(row(
            8,
            "K1",
            "CANCELLED",
            "PENDING",
            0,
            None,
        ))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([row(
            8, "K1", "PENDING", "PENDING", 0, None
        )]))))
        .mount(&server)
        .await;

    let ctrl = controller(&server);
    let reg = registration(&ctrl, 8).await;
    let cmd = Command::CancelRegistration {
        registration: Box::new(reg),
    };
    assert!(cmd.is_destructive());
    ctrl.execute(cmd).await.unwrap();
}

#[tokio::test]
async fn backend_rejection_surfaces_friendly_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dang-ky-thang"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": "Xe đã có đăng ký tháng đang hoạt động",
            "error": "Bad Request",
        })))
        .mount(&server)
        .await;

    let err = controller(&server)
        .execute(Command::CreateRegistration(CreateRegistrationRequest {
            plate: "51A-000.01".into(),
            months: 1,
            user_id: None,
            starts_on: None,
            amount: None,
            note: None,
        }))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
    assert!(err.user_message().contains("đang hoạt động"));
}

#[test]
fn search_plan_restores_without_request() {
    let mut view = RegistrationView::default();
    assert!(matches!(
        view.begin_search(SearchQuery::new(SearchField::Plate, "   ")),
        SearchPlan::Restore
    ));
}
