use axum::{
    extract::{Path, Query},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use swagdoc::{Api, ApiGroup, ApiRoot, ApiRouter, Reflect, Sample, SwagResult, SwaggerRoot};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "camelCase")]
#[swag(xml = "User")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[swag(swagger = "desc(User Status)")]
    pub user_status: i32,
}

/// Headers returned by a successful login
#[derive(Reflect, Default)]
struct LoginHeaders {
    #[swag(json = "X-Rate-Limit", swagger = "desc(calls per hour allowed by the user)")]
    rate_limit: i32,
    #[swag(json = "X-Expires-After", swagger = "desc(date in UTC when token expires)")]
    expires_after: DateTime<Utc>,
}

#[derive(Reflect)]
struct Credentials {
    #[swag(query = "username", swagger = "required,desc(The user name for login)")]
    username: String,
    #[swag(query = "password", swagger = "required,desc(The password for login in clear text)")]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub username: String,
    #[allow(dead_code)]
    pub password: String,
}

async fn create_user(Json(_user): Json<User>) -> StatusCode {
    StatusCode::OK
}

async fn create_users(Json(_users): Json<Vec<User>>) -> StatusCode {
    StatusCode::OK
}

async fn login(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert("X-Rate-Limit", HeaderValue::from_static("5000"));
    let expires = (Utc::now() + Duration::hours(1)).to_rfc3339();
    if let Ok(value) = HeaderValue::from_str(&expires) {
        headers.insert("X-Expires-After", value);
    }
    (headers, format!("logged in user session: {}", query.username))
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

async fn get_user(Path(username): Path<String>) -> Result<Json<User>, StatusCode> {
    if username.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(User {
        id: 1,
        username,
        ..User::default()
    }))
}

async fn update_user(Path(_username): Path<String>, Json(_user): Json<User>) -> StatusCode {
    StatusCode::OK
}

async fn delete_user(Path(_username): Path<String>) -> StatusCode {
    StatusCode::OK
}

pub fn register(root: &SwaggerRoot) -> SwagResult<()> {
    let group = root.group("user", "/user")?;
    group
        .set_description("Operations about user")
        .set_external_docs("Find out more about our store", "http://swagger.io");

    group
        .post("", create_user)
        .set_operation_id("createUser")
        .set_summary("Create user")
        .set_description("This can only be done by the logged in user.")
        .add_param_body(&User::default(), "body", "Created user object", true)?;

    group
        .post("/createWithArray", create_users)
        .set_operation_id("createUsersWithArrayInput")
        .set_summary("Creates list of users with given input array")
        .add_param_body(&vec![User::default()], "body", "List of user object", true)?;

    group
        .get("/login", login)
        .set_operation_id("loginUser")
        .set_summary("Logs user into the system")
        .add_param_query_nested::<Credentials>()?
        .add_response(
            200,
            "successful operation",
            Some(Sample::of(&String::new())),
            Some(Sample::of(&LoginHeaders::default())),
        )?
        .add_response(400, "Invalid username/password supplied", None, None)?;

    group
        .get("/logout", logout)
        .set_operation_id("logoutUser")
        .set_summary("Logs out current logged in user session");

    group
        .get("/:username", get_user)
        .set_operation_id("getUserByName")
        .set_summary("Get user by user name")
        .add_param_path::<String>("username", "The name that needs to be fetched. Use user1 for testing. ")?
        .add_response(200, "successful operation", Some(Sample::of(&User::default())), None)?
        .add_response(400, "Invalid username supplied", None, None)?
        .add_response(404, "User not found", None, None)?;

    group
        .put("/:username", update_user)
        .set_operation_id("updateUser")
        .set_summary("Updated user")
        .set_description("This can only be done by the logged in user.")
        .add_param_path::<String>("username", "name that need to be updated")?
        .add_param_body(&User::default(), "body", "Updated user object", true)?
        .add_response(400, "Invalid user supplied", None, None)?
        .add_response(404, "User not found", None, None)?;

    group
        .delete("/:username", delete_user)
        .set_operation_id("deleteUser")
        .set_summary("Delete user")
        .add_param_path::<String>("username", "The name that needs to be deleted")?
        .add_response(400, "Invalid username supplied", None, None)?
        .add_response(404, "User not found", None, None)?;

    Ok(())
}
