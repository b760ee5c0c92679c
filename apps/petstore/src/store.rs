use axum::{extract::Path, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swagdoc::{Api, ApiGroup, ApiRoot, ApiRouter, Reflect, Sample, SwagResult, SwaggerRoot};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Approved,
    Delivered,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "camelCase")]
#[swag(xml = "Order")]
pub struct Order {
    pub id: i64,
    pub pet_id: i64,
    pub quantity: i32,
    pub ship_date: DateTime<Utc>,
    #[swag(swagger = "desc(Order Status),enum(placed|approved|delivered)")]
    pub status: OrderStatus,
    pub complete: bool,
}

async fn inventory() -> Json<HashMap<String, i32>> {
    let mut counts = HashMap::new();
    counts.insert("available".to_string(), 2);
    Json(counts)
}

async fn place_order(Json(order): Json<Order>) -> Json<Order> {
    Json(order)
}

async fn get_order(Path(id): Path<i64>) -> Result<Json<Order>, StatusCode> {
    if !(1..=10).contains(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(Order {
        id,
        pet_id: 1,
        quantity: 1,
        ship_date: Utc::now(),
        ..Order::default()
    }))
}

async fn delete_order(Path(id): Path<i64>) -> StatusCode {
    if id < 1 {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

pub fn register(root: &SwaggerRoot) -> SwagResult<()> {
    let group = root.group("store", "/store")?;
    group.set_description("Access to Petstore orders");

    let mut counts = HashMap::new();
    counts.insert("available".to_string(), 0i32);
    group
        .get("/inventory", inventory)
        .set_operation_id("getInventory")
        .set_summary("Returns pet inventories by status")
        .set_description("Returns a map of status codes to quantities")
        .set_response_content_type(&["application/json"])
        .add_response(200, "successful operation", Some(Sample::of(&counts)), None)?
        .set_security(&["api_key"]);

    group
        .post("/order", place_order)
        .set_operation_id("placeOrder")
        .set_summary("Place an order for a pet")
        .add_param_body(&Order::default(), "body", "order placed for purchasing the pet", true)?
        .add_response(200, "successful operation", Some(Sample::of(&Order::default())), None)?
        .add_response(400, "Invalid Order", None, None)?;

    group
        .get("/order/:orderId", get_order)
        .set_operation_id("getOrderById")
        .set_summary("Find purchase order by ID")
        .set_description(
            "For valid response try integer IDs with value >= 1 and <= 10. Other values will generated exceptions",
        )
        .add_param_path::<i64>("orderId", "ID of pet that needs to be fetched")?
        .add_response(200, "successful operation", Some(Sample::of(&Order::default())), None)?
        .add_response(400, "Invalid ID supplied", None, None)?
        .add_response(404, "Order not found", None, None)?;

    group
        .delete("/order/:orderId", delete_order)
        .set_operation_id("deleteOrder")
        .set_summary("Delete purchase order by ID")
        .add_param_path::<i64>("orderId", "ID of the order that needs to be deleted")?
        .add_response(400, "Invalid ID supplied", None, None)?
        .add_response(404, "Order not found", None, None)?;

    Ok(())
}
