mod common;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage};
use backend::db::txn::SharedTxn;
use backend::error::AppError;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::utf8_charset::Utf8Charset;
use backend::routes;
use backend::AppState;
use serde_json::{json, Value};

use crate::common::{assert_empty_client_error, build_test_state};

const MS_2020_01_01: i64 = 1_577_836_800_000;
const MS_1999_12_31: i64 = 946_684_799_999;
const MS_3001_01_01: i64 = 32_535_216_000_000;

async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(Utf8Charset)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

fn valid_body() -> Value {
    json!({
        "name": "Aria",
        "title": "Knight",
        "race": "ELF",
        "profession": "WARRIOR",
        "birthday": MS_2020_01_01,
        "level": 5
    })
}

async fn post_player<S>(app: &S, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/rest/players")
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

async fn count_players<S>(app: &S) -> u64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri("/rest/players/count")
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    body["count"].as_u64().expect("count should be a number")
}

#[tokio::test]
async fn test_create_player_returns_record_and_bumps_count() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    assert_eq!(count_players(&app).await, 0);

    let resp = post_player(&app, valid_body()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() >= 1);
    assert_eq!(body["name"], "Aria");
    assert_eq!(body["title"], "Knight");
    assert_eq!(body["race"], "ELF");
    assert_eq!(body["profession"], "WARRIOR");
    assert_eq!(body["birthday"], MS_2020_01_01);
    assert_eq!(body["banned"], false);
    assert_eq!(body["level"], 5);

    assert_eq!(count_players(&app).await, 1);

    Ok(())
}

#[tokio::test]
async fn test_create_player_accepts_boundary_lengths() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let mut body = valid_body();
    body["name"] = json!("A".repeat(12));
    body["title"] = json!("T".repeat(30));
    let resp = post_player(&app, body).await;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_create_player_honors_explicit_banned() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let mut body = valid_body();
    body["banned"] = json!(true);
    let resp = post_player(&app, body).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["banned"], true);

    Ok(())
}

#[tokio::test]
async fn test_create_player_validation_failures() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let mutations: Vec<(&str, Value)> = vec![
        ("name", Value::Null),
        ("name", json!("")),
        ("name", json!("ThirteenChars")),
        ("title", Value::Null),
        ("title", json!("")),
        ("title", json!("T".repeat(31))),
        ("race", Value::Null),
        ("profession", Value::Null),
        ("birthday", Value::Null),
        ("birthday", json!(-1)),
        ("birthday", json!(MS_1999_12_31)),
        ("birthday", json!(MS_3001_01_01)),
        ("level", Value::Null),
    ];

    for (field, value) in mutations {
        let mut body = valid_body();
        body[field] = value.clone();
        let resp = post_player(&app, body).await;
        assert_empty_client_error(resp, 400).await;
    }

    // Nothing was persisted by any rejected request
    assert_eq!(count_players(&app).await, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_player_rejects_unknown_race() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let mut body = valid_body();
    body["race"] = json!("GNOME");
    let resp = post_player(&app, body).await;
    assert_empty_client_error(resp, 400).await;

    Ok(())
}

#[tokio::test]
async fn test_create_player_rejects_malformed_json() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let req = test::TestRequest::post()
        .uri("/rest/players")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 400).await;

    Ok(())
}

#[tokio::test]
async fn test_list_players_pagination() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    for i in 0..10 {
        let mut body = valid_body();
        body["name"] = json!(format!("Player{i}"));
        let resp = post_player(&app, body).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Defaults: pageNumber=0, pageSize=3
    let req = test::TestRequest::get().uri("/rest/players").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    let records = page.as_array().expect("list response should be an array");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], "Player0");

    // 10 players at size 3: pages of 3, 3, 3, 1, 0
    for (page_number, expected_len) in [(0u64, 3usize), (1, 3), (2, 3), (3, 1), (4, 0)] {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/rest/players?pageNumber={page_number}&pageSize=3"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        assert_eq!(page.as_array().unwrap().len(), expected_len);
    }

    // Records are ordered by id: page 1 starts at the fourth player
    let req = test::TestRequest::get()
        .uri("/rest/players?pageNumber=1&pageSize=3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page[0]["name"], "Player3");

    Ok(())
}

#[tokio::test]
async fn test_list_players_rejects_negative_page() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let req = test::TestRequest::get()
        .uri("/rest/players?pageNumber=-1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 400).await;

    Ok(())
}

#[tokio::test]
async fn test_list_response_is_utf8_json() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let req = test::TestRequest::get().uri("/rest/players").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.contains("charset=utf-8"),
        "expected forced utf-8 charset, got: {content_type}"
    );

    Ok(())
}

#[tokio::test]
async fn test_update_player_partial_leaves_other_fields() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let resp = post_player(&app, valid_body()).await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/rest/players/{id}"))
        .set_json(json!({"title": "Queen"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Queen");
    // Absent fields keep their stored values
    assert_eq!(updated["name"], "Aria");
    assert_eq!(updated["race"], "ELF");
    assert_eq!(updated["profession"], "WARRIOR");
    assert_eq!(updated["banned"], false);
    assert_eq!(updated["birthday"], MS_2020_01_01);
    assert_eq!(updated["level"], 5);

    Ok(())
}

#[tokio::test]
async fn test_update_player_ignores_birthday_and_level() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let resp = post_player(&app, valid_body()).await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    // Birthday and level are not part of the update contract; unknown
    // keys are dropped on the floor.
    let req = test::TestRequest::post()
        .uri(&format!("/rest/players/{id}"))
        .set_json(json!({"banned": true, "birthday": 0, "level": 99}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["banned"], true);
    assert_eq!(updated["birthday"], MS_2020_01_01);
    assert_eq!(updated["level"], 5);

    Ok(())
}

// Known contract asymmetry: create rejects an empty title, update accepts
// it (only the upper length bound is checked on update).
#[tokio::test]
async fn test_update_player_accepts_empty_title_unlike_create() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let resp = post_player(&app, valid_body()).await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/rest/players/{id}"))
        .set_json(json!({"title": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "");

    Ok(())
}

#[tokio::test]
async fn test_update_player_validation_failures() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let resp = post_player(&app, valid_body()).await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    for body in [
        json!({"name": ""}),
        json!({"name": "ThirteenChars"}),
        json!({"title": "T".repeat(31)}),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/rest/players/{id}"))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_empty_client_error(resp, 400).await;
    }

    Ok(())
}

#[tokio::test]
async fn test_update_player_bad_ids() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    for id in ["0", "-5"] {
        let req = test::TestRequest::post()
            .uri(&format!("/rest/players/{id}"))
            .set_json(json!({"name": "Bran"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_empty_client_error(resp, 400).await;
    }

    // Non-numeric path segment
    let req = test::TestRequest::post()
        .uri("/rest/players/abc")
        .set_json(json!({"name": "Bran"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 400).await;

    // Unknown id
    let req = test::TestRequest::post()
        .uri("/rest/players/9999")
        .set_json(json!({"name": "Bran"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 404).await;

    Ok(())
}

#[tokio::test]
async fn test_delete_player_flow() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = init_app(state).await;

    let resp = post_player(&app, valid_body()).await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(count_players(&app).await, 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/rest/players/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(body.is_empty(), "delete success has an empty body");

    assert_eq!(count_players(&app).await, 0);

    // Deleting again → 404
    let req = test::TestRequest::delete()
        .uri(&format!("/rest/players/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 404).await;

    // Bad id → 400
    let req = test::TestRequest::delete()
        .uri("/rest/players/0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_empty_client_error(resp, 400).await;

    Ok(())
}

#[tokio::test]
async fn test_shared_txn_rollback_discards_create() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = backend::db::require_db(&state)?.clone();
    let app = init_app(state).await;

    let shared = SharedTxn::open(&db).await?;

    let req = test::TestRequest::post()
        .uri("/rest/players")
        .set_json(valid_body())
        .to_request();
    req.extensions_mut().insert(shared.clone());

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // Reading the body drops the request, and with it the extension clone.
    let _: Value = test::read_body_json(resp).await;

    shared.rollback().await?;

    // The create above never committed
    assert_eq!(count_players(&app).await, 0);

    Ok(())
}
