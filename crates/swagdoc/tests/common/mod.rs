#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub async fn ok() -> &'static str {
    "OK"
}

/// GET `path` with extra request headers; returns status and body text
pub async fn get(router: Router, path: &str, headers: &[(&str, &str)]) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(Body::empty()).unwrap();

    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// GET the spec endpoint, expecting success, with `Host: example.com`
pub async fn get_spec(router: Router, path: &str) -> Value {
    let (status, body) = get(router, path, &[("host", "example.com")]).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    serde_json::from_str(&body).unwrap()
}
