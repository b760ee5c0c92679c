mod common;

use axum::{http::StatusCode, Router};
use common::{get, ok};
use swagdoc::{Api, ApiRoot, ApiRouter, Info, SwaggerRoot, UiSetting, DEFAULT_CDN};

const HIDDEN_TOP_BAR: &str = "display: none;";

async fn page(root: SwaggerRoot) -> String {
    let (status, body) = get(root.into_router(), "/doc", &[("host", "example.com")]).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    body
}

#[tokio::test]
async fn test_inline_spec_page() {
    let root = SwaggerRoot::new(Router::new(), "/doc", None);
    root.get("/ping", ok);
    let body = page(root).await;

    assert!(body.contains("<title>Project APIs</title>"));
    assert!(body.contains(&format!("{}/swagger-ui.css", DEFAULT_CDN)));
    assert!(body.contains(&format!("{}/swagger-ui-standalone-preset.js", DEFAULT_CDN)));
    assert!(body.contains(r#"{\"swagger\":\"2.0\""#));
    assert!(body.contains(r#"var docPath = "/doc""#));
    assert!(body.contains(HIDDEN_TOP_BAR));
}

#[tokio::test]
async fn test_detached_spec_page() {
    let root = SwaggerRoot::new(Router::new(), "/doc", None);
    root.set_ui(UiSetting::default().with_detach_spec(true));
    let body = page(root).await;

    assert!(body.contains(r#"var specStr = """#));
    assert!(body.contains(r#"var specPath = "swagger.json""#));
    assert!(!body.contains(HIDDEN_TOP_BAR));
}

#[tokio::test]
async fn test_detached_spec_page_can_hide_top_bar() {
    let root = SwaggerRoot::new(Router::new(), "/doc", None);
    root.set_ui(
        UiSetting::default()
            .with_detach_spec(true)
            .with_hide_top(true)
            .with_cdn("https://cdn.example.com/swagger-ui"),
    );
    let body = page(root).await;

    assert!(body.contains(HIDDEN_TOP_BAR));
    assert!(body.contains("https://cdn.example.com/swagger-ui/swagger-ui-bundle.js"));
    assert!(!body.contains(DEFAULT_CDN));
}

#[tokio::test]
async fn test_title_is_escaped() {
    let root = SwaggerRoot::new(Router::new(), "/doc", Some(Info::new("Pets & <Owners>", "")));
    let body = page(root).await;
    assert!(body.contains("<title>Pets &amp; &lt;Owners&gt;</title>"));
}

#[tokio::test]
async fn test_detached_page_survives_assembly_errors() {
    let root = SwaggerRoot::new(Router::new(), "/doc", None);
    root.set_ui(UiSetting::default().with_detach_spec(true));
    root.get("/", ok).set_security(&["JWT"]);
    let router = root.into_router();

    let (status, _) = get(router.clone(), "/doc", &[]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(router, "/doc/swagger.json", &[]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
