//! Integration tests for the HTTP surface.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without starting a TCP server, against the in-memory store and the
//! static auth backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use cekilis_auth::{AuthGate, StaticAccount, StaticAuth};
use cekilis_server::router::build_router;
use cekilis_server::state::AppState;
use cekilis_store::{MemoryStore, Store};
use chrono::FixedOffset;
use serde_json::{Value, json};
use tower::ServiceExt;

const EMAIL: &str = "admin@example.com";
const PASSWORD: &str = "hunter2";

fn make_state() -> Arc<AppState> {
    make_state_at("http://localhost:3000")
}

fn make_state_at(site_url: &str) -> Arc<AppState> {
    let auth = AuthGate::from(StaticAuth::new(&[StaticAccount {
        email: EMAIL.to_owned(),
        password: PASSWORD.to_owned(),
    }]));
    let state = AppState::new(
        Store::from(MemoryStore::new()),
        auth,
        site_url,
        FixedOffset::east_opt(3 * 3600).unwrap(),
    )
    .unwrap();
    Arc::new(state)
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> Response<Body> {
    build_router(Arc::clone(state)).oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Sign in and return the `Cookie` header value for the session.
async fn sign_in(state: &Arc<AppState>) -> String {
    let response = send(
        state,
        form("/sign-in", &format!("email={EMAIL}&password={PASSWORD}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/protected");

    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_owned()
}

async fn create_giveaway(state: &Arc<AppState>, cookie: &str, name: &str, date: &str) -> i64 {
    let response = send(
        state,
        json_request("POST", "/giveaways", &json!({ "name": name, "date": date }), cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_winner(state: &Arc<AppState>, cookie: &str, body: &Value) -> Response<Body> {
    send(state, json_request("POST", "/winners", body, cookie)).await
}

// =========================================================================
// Open routes
// =========================================================================

#[tokio::test]
async fn test_healthz() {
    let state = make_state();
    let response = send(&state, Request::get("/healthz").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_state();
    let response = send(&state, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Çekiliş Sistemi"));
    assert!(html.contains("/sign-in"));
}

#[tokio::test]
async fn test_reads_are_open() {
    let state = make_state();
    let response = send(&state, Request::get("/giveaways").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = send(&state, Request::get("/winners").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

// =========================================================================
// Auth gate
// =========================================================================

#[tokio::test]
async fn test_writes_without_session_redirect_to_sign_in() {
    let state = make_state();
    let request = Request::post("/giveaways")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Kasım","date":"2025-11-01"}"#))
        .unwrap();
    let response = send(&state, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/sign-in");

    let response = send(&state, authed("DELETE", "/winners?id=1", "cekilis_session=forged")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_protected_pages_need_session() {
    let state = make_state();
    for path in ["/protected", "/protected/reset-password", "/protected/giveaways/1"] {
        let response = send(&state, Request::get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/sign-in");
    }
}

#[tokio::test]
async fn test_bad_credentials_redirect_with_error() {
    let state = make_state();
    let response = send(&state, form("/sign-in", "email=admin%40example.com&password=nope", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/sign-in?error=Invalid+login+credentials");
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_sign_up_requires_both_fields() {
    let state = make_state();
    let response = send(&state, form("/sign-up", "email=new%40example.com", None)).await;
    assert_eq!(
        location(&response),
        "/sign-up?error=Email+and+password+are+required"
    );

    let response = send(&state, form("/sign-up", "email=new%40example.com&password=pw", None)).await;
    assert!(location(&response).starts_with("/sign-up?success=Thanks+for+signing+up"));
}

#[tokio::test]
async fn test_forgot_password_flow() {
    let state = make_state();
    let response = send(&state, form("/forgot-password", "email=", None)).await;
    assert_eq!(location(&response), "/forgot-password?error=Email+is+required");

    let response = send(&state, form("/forgot-password", "email=admin%40example.com", None)).await;
    assert!(location(&response).starts_with("/forgot-password?success=Check+your+email"));

    let response = send(
        &state,
        form("/forgot-password", "email=admin%40example.com&callbackUrl=%2Fsign-in", None),
    )
    .await;
    assert_eq!(location(&response), "/sign-in");
}

#[tokio::test]
async fn test_reset_password_validation() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let response = send(&state, form("/protected/reset-password", "password=a", Some(&cookie))).await;
    assert_eq!(
        location(&response),
        "/protected/reset-password?error=Password+and+confirm+password+are+required"
    );

    let response = send(
        &state,
        form("/protected/reset-password", "password=a&confirmPassword=b", Some(&cookie)),
    )
    .await;
    assert_eq!(
        location(&response),
        "/protected/reset-password?error=Passwords+do+not+match"
    );

    let response = send(
        &state,
        form("/protected/reset-password", "password=yeni&confirmPassword=yeni", Some(&cookie)),
    )
    .await;
    assert_eq!(
        location(&response),
        "/protected/reset-password?success=Password+updated"
    );
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let response = send(&state, form("/sign-out", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/sign-in");
    let cleared = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = send(&state, authed("GET", "/protected", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_https_site_sets_secure_cookie() {
    let state = make_state_at("https://cekilis.example.com/");
    assert!(state.secure_cookies);
    assert_eq!(state.site_url, "https://cekilis.example.com");

    let response = send(
        &state,
        form("/sign-in", &format!("email={EMAIL}&password={PASSWORD}"), None),
    )
    .await;
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.ends_with("; Secure"));

    let response = send(&state, form("/sign-out", "", None)).await;
    let cleared = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0") && cleared.contains("Secure"));
}

#[tokio::test]
async fn test_http_site_cookie_not_secure() {
    let state = make_state();
    let response = send(
        &state,
        form("/sign-in", &format!("email={EMAIL}&password={PASSWORD}"), None),
    )
    .await;
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(!set_cookie.contains("Secure"));
}

// =========================================================================
// Giveaways
// =========================================================================

#[tokio::test]
async fn test_giveaway_crud() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let id = create_giveaway(&state, &cookie, "Ekim", "2025-10-01").await;
    create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;

    let response = send(&state, Request::get("/giveaways").body(Body::empty()).unwrap()).await;
    let list = body_json(response).await;
    assert_eq!(list[0]["name"], "Kasım");
    assert_eq!(list[1]["name"], "Ekim");

    let response = send(
        &state,
        json_request(
            "PUT",
            "/giveaways",
            &json!({ "id": id, "name": "Ekim Çekilişi", "date": "2025-10-02" }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["date"], "2025-10-02");

    let response = send(&state, authed("DELETE", &format!("/giveaways?id={id}"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Çekiliş başarıyla silindi" })
    );
}

#[tokio::test]
async fn test_giveaway_missing_fields_is_400() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let response = send(
        &state,
        json_request("POST", "/giveaways", &json!({ "name": "Kasım" }), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "name and date are required");
}

#[tokio::test]
async fn test_column_name_aliases_are_accepted() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let response = send(
        &state,
        json_request("POST", "/giveaways", &json!({ "ad": "Kasım", "tarih": "2025-11-01" }), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = create_winner(
        &state,
        &cookie,
        &json!({ "cekilis_id": id, "hesap_adi": "ayse_k", "ad_soyad": "Ayşe K." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["fullName"], "Ayşe K.");
}

#[tokio::test]
async fn test_delete_without_id_is_400() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    for uri in ["/giveaways", "/winners", "/winners?id=", "/winners?id=abc"] {
        let response = send(&state, authed("DELETE", uri, &cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let request = Request::post("/winners")
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&state, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

// =========================================================================
// Winners
// =========================================================================

#[tokio::test]
async fn test_november_scenario() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let kasim = create_giveaway(&state, &cookie, "Kasım Çekilişi", "2025-11-01").await;
    let aralik = create_giveaway(&state, &cookie, "Aralık Çekilişi", "2025-12-01").await;

    let response = create_winner(
        &state,
        &cookie,
        &json!({
            "handle": "ayse_k",
            "fullName": "Ayşe K.",
            "phone": "5551112233",
            "address": "İstanbul",
            "giveawayId": kasim,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let winner = body_json(response).await;
    assert!(winner["id"].as_i64().is_some());
    assert!(winner["createdAt"].is_string());
    assert_eq!(winner["giveawayId"], kasim);

    let response = create_winner(
        &state,
        &cookie,
        &json!({ "handle": "ayse_k", "giveawayId": aralik }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "handle already used in another giveaway"
    );
}

#[tokio::test]
async fn test_blank_handle_is_400() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let id = create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;

    let response = create_winner(&state, &cookie, &json!({ "handle": "   ", "giveawayId": id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "handle required");

    let response = send(&state, Request::get("/winners").body(Body::empty()).unwrap()).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_update_winner_uniqueness() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let id = create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;

    let alice = body_json(create_winner(&state, &cookie, &json!({ "handle": "alice", "giveawayId": id })).await).await;
    create_winner(&state, &cookie, &json!({ "handle": "bob", "giveawayId": id })).await;

    let response = send(
        &state,
        json_request(
            "PUT",
            "/winners",
            &json!({ "id": alice["id"], "handle": "bob", "giveawayId": id }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &state,
        json_request(
            "PUT",
            "/winners",
            &json!({ "id": alice["id"], "handle": " alice ", "phone": "5550000000", "giveawayId": id }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["handle"], "alice");
    assert_eq!(updated["phone"], "5550000000");

    let response = send(
        &state,
        json_request(
            "PUT",
            "/winners",
            &json!({ "id": 999, "handle": "carol", "giveawayId": id }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_winners_filtered_with_giveaway() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let first = create_giveaway(&state, &cookie, "Ekim", "2025-10-01").await;
    let second = create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;
    create_winner(&state, &cookie, &json!({ "handle": "alice", "giveawayId": first })).await;
    create_winner(&state, &cookie, &json!({ "handle": "bob", "giveawayId": second })).await;

    let response = send(
        &state,
        Request::get(format!("/winners?giveawayId={second}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["handle"], "bob");
    assert_eq!(list[0]["giveaway"]["name"], "Kasım");

    let response = send(
        &state,
        Request::get("/winners?giveawayId=abc").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_winner() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let id = create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;
    let winner = body_json(create_winner(&state, &cookie, &json!({ "handle": "alice", "giveawayId": id })).await).await;
    let uri = format!("/winners?id={}", winner["id"]);

    let response = send(&state, authed("DELETE", &uri, &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let response = send(&state, authed("DELETE", &uri, &cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], 404);
}

// =========================================================================
// Pages and export
// =========================================================================

#[tokio::test]
async fn test_winner_page_search_and_message() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let id = create_giveaway(&state, &cookie, "Kasım", "2025-11-01").await;
    create_winner(&state, &cookie, &json!({ "handle": "ayse_k", "address": "İstanbul", "giveawayId": id })).await;
    create_winner(&state, &cookie, &json!({ "handle": "mehmet", "address": "Ankara", "giveawayId": id })).await;

    let response = send(&state, authed("GET", &format!("/protected/giveaways/{id}"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Merhaba @ayse_k, çekilişimizi kazandınız!"));
    assert!(html.contains("@mehmet"));
    assert!(html.contains(EMAIL));

    let response = send(
        &state,
        authed("GET", &format!("/protected/giveaways/{id}?q=ankara"), &cookie),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("@mehmet"));
    assert!(!html.contains("@ayse_k"));
}

#[tokio::test]
async fn test_giveaway_page_lists_giveaways() {
    let state = make_state();
    let cookie = sign_in(&state).await;

    let response = send(&state, authed("GET", "/protected", &cookie)).await;
    assert!(body_text(response).await.contains("Henüz çekiliş bulunmuyor"));

    create_giveaway(&state, &cookie, "Kasım Çekilişi", "2025-11-01").await;
    let response = send(&state, authed("GET", "/protected", &cookie)).await;
    let html = body_text(response).await;
    assert!(html.contains("Kasım Çekilişi"));
    assert!(html.contains("01.11.2025"));
}

#[tokio::test]
async fn test_unknown_giveaway_page_is_404() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let response = send(&state, authed("GET", "/protected/giveaways/42", &cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_csv() {
    let state = make_state();
    let cookie = sign_in(&state).await;
    let id = create_giveaway(&state, &cookie, "Kasım Çekilişi", "2025-11-01").await;
    create_winner(
        &state,
        &cookie,
        &json!({ "handle": "ayse_k", "fullName": "Ayşe K.", "giveawayId": id }),
    )
    .await;

    let response = send(
        &state,
        authed("GET", &format!("/protected/giveaways/{id}/export"), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_owned();
    assert!(disposition.starts_with("attachment; filename=\"kazananlar-kasim-cekilisi-"));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Hesap Adı,Ad Soyad,Telefon,Adres,Notlar,Tarih"));
    assert!(text.contains("ayse_k,Ayşe K.,"));
}
