use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use swagdoc::{
    Api, ApiGroup, ApiRoot, ApiRouter, Reflect, Sample, SecurityRequirement, SwagResult,
    SwaggerRoot,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[swag(xml = "Category")]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[swag(xml = "Tag")]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[swag(xml = "Pet")]
pub struct Pet {
    pub id: i64,
    pub category: Option<Category>,
    #[swag(swagger = "required")]
    pub name: String,
    #[serde(rename = "photoUrls")]
    #[swag(xml = "photoUrl", swagger = "required")]
    pub photo_urls: Vec<String>,
    #[swag(xml = "tag")]
    pub tags: Vec<Tag>,
    #[swag(swagger = "desc(pet status in the store),enum(available|pending|sold)")]
    pub status: PetStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Query of `findByStatus`. Documented only; the handler reads the raw string.
#[derive(Reflect)]
struct StatusQuery {
    #[swag(
        query = "status",
        swagger = "required,desc(Status values that need to be considered for filter),enum(available|pending|sold),default(available)"
    )]
    status: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    #[serde(default)]
    pub status: Option<String>,
}

fn pet_auth() -> SecurityRequirement {
    let mut req = SecurityRequirement::new();
    req.insert(
        "petstore_auth".to_string(),
        vec!["write:pets".to_string(), "read:pets".to_string()],
    );
    req
}

fn sample_pet(id: i64) -> Pet {
    Pet {
        id,
        category: Some(Category {
            id: 1,
            name: "Dogs".to_string(),
        }),
        name: "doggie".to_string(),
        photo_urls: vec!["http://example.com/doggie.png".to_string()],
        tags: Vec::new(),
        status: PetStatus::Available,
    }
}

async fn add_pet(Json(pet): Json<Pet>) -> Json<Pet> {
    Json(pet)
}

async fn update_pet(Json(pet): Json<Pet>) -> Json<Pet> {
    Json(pet)
}

async fn find_by_status(Query(filter): Query<StatusFilter>) -> Json<Vec<Pet>> {
    let status = match filter.status.as_deref() {
        Some("pending") => PetStatus::Pending,
        Some("sold") => PetStatus::Sold,
        _ => PetStatus::Available,
    };
    let pets = (1..=2)
        .map(|id| Pet {
            status: status.clone(),
            ..sample_pet(id)
        })
        .collect();
    Json(pets)
}

async fn get_pet(Path(id): Path<i64>) -> Result<Json<Pet>, StatusCode> {
    if id <= 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(sample_pet(id)))
}

async fn update_pet_with_form(Path(id): Path<i64>) -> StatusCode {
    if id <= 0 {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        StatusCode::OK
    }
}

async fn delete_pet(Path(id): Path<i64>) -> StatusCode {
    if id <= 0 {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

async fn upload_image(Path(_id): Path<i64>) -> Json<ApiResponse> {
    Json(ApiResponse {
        code: 200,
        kind: "unknown".to_string(),
        message: "file uploaded".to_string(),
    })
}

pub fn register(root: &SwaggerRoot) -> SwagResult<()> {
    let group = root.group("pet", "/pet")?;
    group
        .set_description("Everything about your Pets")
        .set_external_docs("Find out more", "http://swagger.io");

    group
        .post("", add_pet)
        .set_operation_id("addPet")
        .set_summary("Add a new pet to the store")
        .add_param_body(&Pet::default(), "body", "Pet object that needs to be added to the store", true)?
        .add_response(405, "Invalid input", None, None)?
        .set_security_with_scope(pet_auth());

    group
        .put("", update_pet)
        .set_operation_id("updatePet")
        .set_summary("Update an existing pet")
        .add_param_body(&Pet::default(), "body", "Pet object that needs to be added to the store", true)?
        .add_response(400, "Invalid ID supplied", None, None)?
        .add_response(404, "Pet not found", None, None)?
        .add_response(405, "Validation exception", None, None)?
        .set_security_with_scope(pet_auth());

    group
        .get("/findByStatus", find_by_status)
        .set_operation_id("findPetsByStatus")
        .set_summary("Finds Pets by status")
        .set_description("Multiple status values can be provided with comma separated strings")
        .add_param_query_nested::<StatusQuery>()?
        .add_response(200, "successful operation", Some(Sample::of(&vec![Pet::default()])), None)?
        .add_response(400, "Invalid status value", None, None)?
        .set_security_with_scope(pet_auth());

    group
        .get("/:petId", get_pet)
        .set_operation_id("getPetById")
        .set_summary("Find pet by ID")
        .set_description("Returns a single pet")
        .add_param_path::<i64>("petId", "ID of pet to return")?
        .add_response(200, "successful operation", Some(Sample::of(&Pet::default())), None)?
        .add_response(400, "Invalid ID supplied", None, None)?
        .add_response(404, "Pet not found", None, None)?
        .set_security(&["api_key"]);

    group
        .post("/:petId", update_pet_with_form)
        .set_operation_id("updatePetWithForm")
        .set_summary("Updates a pet in the store with form data")
        .set_request_content_type(&["application/x-www-form-urlencoded"])
        .add_param_path::<i64>("petId", "ID of pet that needs to be updated")?
        .add_param_form::<String>("name", "Updated name of the pet", false)?
        .add_param_form::<String>("status", "Updated status of the pet", false)?
        .add_response(405, "Invalid input", None, None)?
        .set_security_with_scope(pet_auth());

    group
        .delete("/:petId", delete_pet)
        .set_operation_id("deletePet")
        .set_summary("Deletes a pet")
        .add_param_header::<String>("api_key", "", false)?
        .add_param_path::<i64>("petId", "Pet id to delete")?
        .add_response(400, "Invalid ID supplied", None, None)?
        .add_response(404, "Pet not found", None, None)?
        .set_security_with_scope(pet_auth());

    group
        .post("/:petId/uploadImage", upload_image)
        .set_operation_id("uploadFile")
        .set_summary("uploads an image")
        .set_request_content_type(&["multipart/form-data"])
        .set_response_content_type(&["application/json"])
        .add_param_path::<i64>("petId", "ID of pet to update")?
        .add_param_form::<String>("additionalMetadata", "Additional data to pass to server", false)?
        .add_param_file("file", "file to upload", false)
        .add_response(200, "successful operation", Some(Sample::of(&ApiResponse::default())), None)?
        .set_security_with_scope(pet_auth());

    Ok(())
}
