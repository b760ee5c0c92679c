mod common;

use axum::{http::StatusCode, Router};
use chrono::{DateTime, Utc};
use common::{get, get_spec, ok};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use swagdoc::{
    Api, ApiGroup, ApiRoot, ApiRouter, NopRoot, OAuth2Flow, Placement, Reflect, Sample,
    SecurityIn, SwagError, SwaggerRoot,
};

#[derive(Reflect, Serialize, Default)]
#[swag(xml = "Category")]
struct Category {
    id: i64,
    name: String,
}

#[derive(Reflect, Serialize, Default)]
#[serde(rename_all = "lowercase")]
enum Status {
    #[default]
    Available,
    Pending,
    Sold,
}

#[derive(Reflect, Serialize, Default)]
#[swag(xml = "Pet")]
struct Pet {
    #[swag(swagger = "readOnly")]
    id: i64,
    category: Option<Category>,
    #[swag(swagger = "required")]
    name: String,
    #[serde(rename = "photoUrls")]
    #[swag(xml = "photoUrls>photoUrl")]
    photo_urls: Vec<String>,
    #[swag(swagger = "enum(available|pending|sold),desc(pet status in the store)")]
    status: Status,
}

#[derive(Reflect, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct Order {
    id: i64,
    pet_id: i64,
    quantity: i32,
    ship_date: DateTime<Utc>,
    complete: bool,
}

#[derive(Reflect, Default)]
#[swag(rename = "Tag")]
struct PetTag {
    #[swag(xml = "id,attr")]
    id: i64,
    #[swag(xml = ",chardata")]
    name: String,
}

#[derive(Reflect)]
struct FindQuery {
    #[swag(
        query = "status",
        swagger = "required,enum(available|pending|sold),default(available),desc(Status values)"
    )]
    status: Vec<String>,
    #[swag(query = "limit", swagger = "min(1),max(100),default(20)")]
    limit: i32,
    #[swag(query = "-")]
    internal: String,
}

#[derive(Reflect, Default)]
struct RateLimit {
    #[swag(json = "X-Rate-Limit", swagger = "desc(calls per hour allowed by the user)")]
    limit: i32,
    #[swag(json = "X-Expires-After", swagger = "desc(date in UTC when token expires)")]
    expires: DateTime<Utc>,
}

#[derive(Reflect, Serialize, Default)]
struct Audit {
    created_by: String,
}

#[derive(Reflect, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct Invoice {
    #[serde(flatten)]
    audit: Audit,
    total_cents: i64,
    #[serde(rename = "secret", skip)]
    internal_note: String,
}

fn new_root() -> SwaggerRoot {
    SwaggerRoot::new(Router::new(), "/doc", None)
}

async fn spec_of(root: SwaggerRoot) -> Value {
    get_spec(root.into_router(), "/doc/swagger.json").await
}

#[tokio::test]
async fn test_body_definitions() {
    let root = new_root();
    root.post("/pet", ok)
        .add_param_body(&Pet::default(), "body", "Pet object that needs to be added", true)
        .unwrap();

    let spec = spec_of(root).await;
    assert_eq!(
        spec["paths"]["/pet"]["post"]["parameters"],
        json!([{
            "name": "body",
            "in": "body",
            "description": "Pet object that needs to be added",
            "required": true,
            "schema": {"$ref": "#/definitions/Pet"}
        }])
    );
    assert_eq!(
        spec["definitions"]["Pet"],
        json!({
            "type": "object",
            "properties": {
                "category": {"$ref": "#/definitions/Category"},
                "id": {"type": "integer", "format": "int64", "readOnly": true},
                "name": {"type": "string", "format": "string"},
                "photoUrls": {
                    "type": "array",
                    "items": {"type": "string", "format": "string", "xml": {"name": "photoUrl"}},
                    "xml": {"name": "photoUrls", "wrapped": true}
                },
                "status": {
                    "type": "string",
                    "format": "string",
                    "description": "pet status in the store",
                    "example": "available",
                    "enum": ["available", "pending", "sold"]
                }
            },
            "required": ["name"],
            "xml": {"name": "Pet"}
        })
    );
    assert_eq!(
        spec["definitions"]["Category"],
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "name": {"type": "string", "format": "string"}
            },
            "xml": {"name": "Category"}
        })
    );
}

#[tokio::test]
async fn test_examples_from_sample_values() {
    let root = new_root();
    let order = Order {
        id: 10,
        pet_id: 198772,
        quantity: 7,
        complete: true,
        ..Order::default()
    };
    let mut inventory = HashMap::new();
    inventory.insert("available".to_string(), 3);

    root.post("/store/order", ok)
        .add_response(200, "successful operation", Some(Sample::of(&order)), None)
        .unwrap();
    root.get("/store/inventory", ok)
        .add_response(200, "successful operation", Some(Sample::of(&inventory)), None)
        .unwrap();

    let spec = spec_of(root).await;
    assert_eq!(
        spec["definitions"]["Order"]["properties"],
        json!({
            "id": {"type": "integer", "format": "int64", "example": 10},
            "petId": {"type": "integer", "format": "int64", "example": 198772},
            "quantity": {"type": "integer", "format": "int32", "example": 7},
            "shipDate": {"type": "string", "format": "date-time"},
            "complete": {"type": "boolean", "format": "boolean", "example": true}
        })
    );
    assert_eq!(
        spec["paths"]["/store/inventory"]["get"]["responses"]["200"]["schema"],
        json!({
            "type": "object",
            "additionalProperties": {"type": "integer", "format": "int32", "example": 3}
        })
    );
}

#[tokio::test]
async fn test_xml_attributes_and_renamed_definitions() {
    let root = new_root();
    root.get("/tags", ok)
        .add_response(200, "", Some(Sample::of(&vec![PetTag::default()])), None)
        .unwrap();

    let spec = spec_of(root).await;
    assert_eq!(
        spec["paths"]["/tags"]["get"]["responses"]["200"]["schema"],
        json!({"type": "array", "items": {"$ref": "#/definitions/Tag"}})
    );
    assert_eq!(
        spec["definitions"]["Tag"],
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "format": "int64", "xml": {"attribute": "id"}},
                "name": {"type": "string", "format": "string"}
            },
            "xml": {"name": "Tag"}
        })
    );
}

#[tokio::test]
async fn test_flattened_fields_follow_serde() {
    let root = new_root();
    root.post("/invoices", ok)
        .add_param_body(&Invoice::default(), "body", "", true)
        .unwrap();

    let expected_json = serde_json::to_value(Invoice::default()).unwrap();
    assert_eq!(expected_json, json!({"created_by": "", "totalCents": 0}));

    let spec = spec_of(root).await;
    assert_eq!(
        spec["definitions"]["Invoice"]["properties"],
        json!({
            "created_by": {"type": "string", "format": "string"},
            "totalCents": {"type": "integer", "format": "int64"}
        })
    );
    assert!(spec["definitions"].get("Audit").is_none());
}

#[tokio::test]
async fn test_parameters_from_tags() {
    let root = new_root();
    root.get("/pet/findByStatus", ok)
        .add_param_query_nested::<FindQuery>()
        .unwrap();
    root.post("/pet/:petId", ok)
        .add_param_path::<i64>("petId", "ID of pet that needs to be updated")
        .unwrap()
        .add_param_header::<String>("api_key", "", false)
        .unwrap()
        .add_param_form::<String>("name", "Updated name of the pet", false)
        .unwrap()
        .add_param_file("file", "file to upload", false);

    let spec = spec_of(root).await;
    assert_eq!(
        spec["paths"]["/pet/findByStatus"]["get"]["parameters"],
        json!([
            {
                "name": "status",
                "in": "query",
                "description": "Status values",
                "required": true,
                "type": "array",
                "items": {
                    "type": "string",
                    "format": "string",
                    "default": "available",
                    "enum": ["available", "pending", "sold"]
                },
                "collectionFormat": "multi"
            },
            {
                "name": "limit",
                "in": "query",
                "required": false,
                "type": "integer",
                "format": "int32",
                "default": 20,
                "minimum": 1,
                "maximum": 100
            }
        ])
    );
    assert_eq!(
        spec["paths"]["/pet/{petId}"]["post"]["parameters"],
        json!([
            {
                "name": "petId",
                "in": "path",
                "description": "ID of pet that needs to be updated",
                "required": true,
                "type": "integer",
                "format": "int64"
            },
            {"name": "api_key", "in": "header", "required": false, "type": "string", "format": "string"},
            {
                "name": "name",
                "in": "formData",
                "description": "Updated name of the pet",
                "required": false,
                "type": "string",
                "format": "string"
            },
            {
                "name": "file",
                "in": "formData",
                "description": "file to upload",
                "required": false,
                "type": "file"
            }
        ])
    );
}

#[tokio::test]
async fn test_response_headers() {
    let root = new_root();
    root.get("/user/login", ok)
        .add_response(
            200,
            "successful operation",
            Some(Sample::of(&String::new())),
            Some(Sample::of(&RateLimit::default())),
        )
        .unwrap()
        .add_response(400, "Invalid username/password supplied", None, None)
        .unwrap();

    let spec = spec_of(root).await;
    assert_eq!(
        spec["paths"]["/user/login"]["get"]["responses"],
        json!({
            "200": {
                "description": "successful operation",
                "schema": {"type": "string", "format": "string"},
                "headers": {
                    "X-Expires-After": {
                        "description": "date in UTC when token expires",
                        "type": "string",
                        "format": "date-time"
                    },
                    "X-Rate-Limit": {
                        "description": "calls per hour allowed by the user",
                        "type": "integer",
                        "format": "int32"
                    }
                }
            },
            "400": {"description": "Invalid username/password supplied"}
        })
    );
}

#[tokio::test]
async fn test_declaration_errors_reach_the_caller() {
    let root = new_root();
    let mut api = root.post("/pet", ok);
    assert_eq!(
        api.add_param_header_nested::<i32>().err(),
        Some(SwagError::InvalidParam(Placement::Header))
    );
    assert_eq!(
        api.add_param_query::<HashMap<String, i32>>("filter", "", false).err(),
        Some(SwagError::InvalidParam(Placement::Query))
    );
    api.add_param_body(&Pet::default(), "body", "", true).unwrap();
    assert_eq!(
        api.add_param_body(&Category::default(), "other", "", true).err(),
        Some(SwagError::MultipleBody)
    );
    assert_eq!(
        api.add_response(200, "", None, Some(Sample::of(&1i32))).err(),
        Some(SwagError::InvalidResponseHeader)
    );

    let spec = spec_of(root).await;
    assert_eq!(
        spec["paths"]["/pet"]["post"]["parameters"].as_array().map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn test_security_requirements() {
    let root = new_root();
    let mut scopes = BTreeMap::new();
    scopes.insert("write:pets".to_string(), "modify pets in your account".to_string());
    root.add_security_basic("Basic", "Basic auth")
        .add_security_basic("Basic", "ignored duplicate")
        .add_security_api_key("JWT", "JWT token", SecurityIn::Header)
        .add_security_oauth2(
            "OAuth2",
            "",
            OAuth2Flow::Implicit,
            "http://petstore.swagger.io/oauth/dialog",
            "",
            scopes,
        );

    let users = root.group("Users", "/users").unwrap();
    users.set_security(&["JWT"]);
    let mut scoped = BTreeMap::new();
    scoped.insert("OAuth2".to_string(), vec!["write:pets".to_string()]);
    users
        .get("/:id", ok)
        .set_security(&["Basic", "JWT"])
        .set_security(&["JWT"])
        .set_security_with_scope(scoped);

    let spec = spec_of(root).await;
    assert_eq!(
        spec["securityDefinitions"],
        json!({
            "Basic": {"type": "basic", "description": "Basic auth"},
            "JWT": {"type": "apiKey", "description": "JWT token", "name": "JWT", "in": "header"},
            "OAuth2": {
                "type": "oauth2",
                "flow": "implicit",
                "authorizationUrl": "http://petstore.swagger.io/oauth/dialog",
                "scopes": {"write:pets": "modify pets in your account"}
            }
        })
    );
    assert_eq!(
        spec["paths"]["/users/{id}"]["get"]["security"],
        json!([{"JWT": []}, {"Basic": [], "JWT": []}, {"OAuth2": ["write:pets"]}])
    );
}

#[tokio::test]
async fn test_nop_root_mounts_routes_only() {
    let root = NopRoot::new(Router::new());
    root.get("/ping", ok).set_summary("ignored");
    let pets = root.group("Pets", "/pet").unwrap();
    pets.set_security(&["JWT"]);
    pets.get("/:id", ok);
    let router = root.into_router();

    let (status, body) = get(router.clone(), "/ping", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    let (status, _) = get(router.clone(), "/pet/1", &[]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(router, "/doc/swagger.json", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
