/// Product catalog endpoints
///
/// # Endpoints
///
/// - `GET /api/products` - List every product
/// - `GET /api/products/:id` - Get one product
/// - `POST /api/products/add` - Add a product (session required)
/// - `PUT /api/products/update/:id` - Partially update a product (session required)
/// - `DELETE /api/products/delete/:id` - Delete a product (session required)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    middleware::session::CurrentUser,
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use minishop_shared::models::product::{CreateProduct, Product, UpdateProduct};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Add product request
///
/// `name` and `price` are required but modelled as options so that a
/// missing field is reported as a 400 rather than a deserialization error.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1-80 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    pub description: Option<String>,
}

/// Partial update request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1-80 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    pub description: Option<String>,
}

/// Response for a created product
#[derive(Debug, Serialize)]
pub struct ProductCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Response for an updated product
#[derive(Debug, Serialize)]
pub struct ProductUpdatedResponse {
    pub message: String,
    pub product: Product,
}

fn product_not_found() -> ApiError {
    ApiError::NotFound("Product not found".to_string())
}

/// List every product
///
/// An empty catalog is reported as 404 `Product not found`, not as `[]`.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::list_all(&state.db).await?;

    if products.is_empty() {
        return Err(product_not_found());
    }

    Ok(Json(products))
}

/// Get a single product
///
/// ```text
/// GET /api/products/1
/// ```
///
/// ```json
/// {"id": 1, "name": "Pen", "price": 1.5, "description": ""}
/// ```
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    Ok(Json(product))
}

/// Add a product
///
/// ```text
/// POST /api/products/add
/// Content-Type: application/json
///
/// {"name": "Pen", "price": 1.5}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `name` or `price` missing, or out of range
/// - `401 Unauthorized`: no session
pub async fn add_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(req): ApiJson<AddProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductCreatedResponse>)> {
    let (Some(name), Some(price)) = (req.name.clone(), req.price) else {
        return Err(ApiError::BadRequest("Invalid request data".to_string()));
    };
    req.validate()?;

    let product = Product::create(
        &state.db,
        CreateProduct {
            name,
            price,
            description: req.description.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(product_id = product.id, user_id = user.user_id, "Product added");

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product added successfully".to_string(),
            id: product.id,
        }),
    ))
}

/// Partially update a product
///
/// Only the fields present in the body are written.
///
/// # Errors
///
/// - `400 Bad Request`: a present field is out of range
/// - `404 Not Found`: unknown product
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateProductRequest>,
) -> ApiResult<Json<ProductUpdatedResponse>> {
    req.validate()?;

    let product = Product::update(
        &state.db,
        id,
        UpdateProduct {
            name: req.name,
            price: req.price,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(product_not_found)?;

    tracing::info!(product_id = id, user_id = user.user_id, "Product updated");

    Ok(Json(ProductUpdatedResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// Delete a product
///
/// Cart items holding the product are removed with it.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !Product::delete(&state.db, id).await? {
        return Err(product_not_found());
    }

    tracing::info!(product_id = id, user_id = user.user_id, "Product deleted");

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
