use btcafe::adapter::{HostEvent, invoke};
use btcafe::config::Config;
use btcafe::router::{CafeState, cafe_router};

fn app() -> axum::Router {
    // No database URL: health must still answer.
    cafe_router(CafeState::new(Config::default()))
}

fn event(method: &str, path: &str) -> HostEvent {
    HostEvent {
        method: method.to_string(),
        path: path.to_string(),
        headers: Vec::new(),
        body: None,
        is_base64: false,
    }
}

#[tokio::test]
async fn invoke_translates_a_health_check_verbatim() {
    let reply = invoke(app(), event("GET", "/api/health"))
        .await
        .expect("invoke failed");

    assert_eq!(reply.status, 200);
    assert!(!reply.is_base64);
    assert!(reply.body.contains(r#""status":"degraded""#));
    assert!(
        reply
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value.starts_with("application/json"))
    );
}

#[tokio::test]
async fn invoke_carries_json_bodies_into_the_router() {
    let mut login = event("POST", "/api/login");
    login.headers = vec![("content-type".to_string(), "application/json".to_string())];
    login.body = Some(r#"{"username": "owner"}"#.to_string());

    let reply = invoke(app(), login).await.expect("invoke failed");

    // Missing password: the validation layer answered, proving the body
    // made it through the shim unchanged.
    assert_eq!(reply.status, 400);
    assert!(reply.body.contains(r#""field":"password""#));
}

#[tokio::test]
async fn invoke_surfaces_unmatched_routes_as_404() {
    let reply = invoke(app(), event("GET", "/not/a/route"))
        .await
        .expect("invoke failed");
    assert_eq!(reply.status, 404);
    assert!(reply.body.contains("NOT_FOUND"));
}

#[tokio::test]
async fn invoke_rejects_malformed_events() {
    let err = invoke(app(), event("NOT A METHOD", "/api/health")).await;
    assert!(err.is_err());

    let mut bad_body = event("POST", "/api/login");
    bad_body.body = Some("!!! not base64 !!!".to_string());
    bad_body.is_base64 = true;
    assert!(invoke(app(), bad_body).await.is_err());
}
