use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Aircraft, Airport};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- aircraft ---

#[tokio::test]
async fn list_aircraft_empty() {
    let resp = app().oneshot(empty_request("GET", "/aircraft")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let aircraft: Vec<Aircraft> = body_json(resp).await;
    assert!(aircraft.is_empty());
}

#[tokio::test]
async fn create_aircraft_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/aircraft", r#"{"model":"737"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let aircraft: Aircraft = body_json(resp).await;
    assert_eq!(aircraft.id, 1);
    assert_eq!(aircraft.model, "737");
}

#[tokio::test]
async fn create_aircraft_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/aircraft", r#"{"not_model":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_aircraft_not_found_has_plain_body() {
    let resp = app().oneshot(empty_request("GET", "/aircraft/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"not found");
}

#[tokio::test]
async fn get_aircraft_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/aircraft/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_aircraft_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/aircraft/9", r#"{"model":"A320"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- airports ---

#[tokio::test]
async fn duplicate_airport_returns_structured_error() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/airports", r#"{"name":"JFK"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let airport: Airport = body_json(resp).await;
    assert_eq!(airport.name, "JFK");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/airports", r#"{"name":"JFK"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let payload: serde_json::Value = body_json(resp).await;
    assert_eq!(payload["errorCode"], "DUP");
    assert_eq!(payload["message"], "duplicate");
}

// --- status ---

#[tokio::test]
async fn status_route_returns_empty_body() {
    for method in ["GET", "POST", "PUT"] {
        let resp = app()
            .oneshot(empty_request(method, "/status/400"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
        assert!(body_bytes(resp).await.is_empty(), "{method}");
    }
}

#[tokio::test]
async fn status_route_passes_through_server_errors() {
    let resp = app()
        .oneshot(empty_request("GET", "/status/503"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// --- echo ---

#[tokio::test]
async fn echo_accept_returns_every_value() {
    let request = Request::builder()
        .uri("/echo/accept")
        .header(http::header::ACCEPT, "application/json")
        .header(http::header::ACCEPT, "text/plain")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let seen: Vec<String> = body_json(resp).await;
    assert_eq!(seen, vec!["application/json", "text/plain"]);
}

// --- full lifecycle ---

#[tokio::test]
async fn aircraft_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/aircraft", r#"{"model":"737"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Aircraft = body_json(resp).await;
    let id = created.id;

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/aircraft/{id}"),
            r#"{"model":"737 MAX"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Aircraft = body_json(resp).await;
    assert_eq!(updated.model, "737 MAX");

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/aircraft/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Aircraft = body_json(resp).await;
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.model, "737 MAX");

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/aircraft"))
        .await
        .unwrap();
    let all: Vec<Aircraft> = body_json(resp).await;
    assert_eq!(all.len(), 1);
}
