/// Shopping cart endpoints
///
/// Every endpoint requires a session and acts on the caller's own cart.
///
/// # Endpoints
///
/// - `GET /api/cart` - List the caller's cart with product name and price
/// - `POST /api/cart/add/:product_id` - Add one unit of a product
/// - `DELETE /api/cart/remove/:item_id` - Remove one cart item
/// - `POST /api/cart/checkout` - Clear the caller's cart

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiPath,
    middleware::session::CurrentUser,
    routes::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use minishop_shared::models::{
    cart_item::{CartItem, CartLine},
    product::Product,
    user::User,
};
use serde::Serialize;

/// Response for an added cart item
#[derive(Debug, Serialize)]
pub struct CartItemAddedResponse {
    pub message: String,
    pub id: i64,
}

/// Checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,

    /// Number of cart items removed
    pub removed: u64,
}

/// Lists the caller's cart
///
/// ```json
/// [{"id": 3, "user_id": 1, "product_id": 1, "product_name": "Pen", "product_price": 1.5}]
/// ```
///
/// An empty cart is reported as 404, mirroring the product listing.
pub async fn list_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<CartLine>>> {
    let lines = CartItem::list_by_user(&state.db, user.user_id).await?;

    if lines.is_empty() {
        return Err(ApiError::NotFound("Cart is empty".to_string()));
    }

    Ok(Json(lines))
}

/// Adds one unit of a product to the caller's cart
///
/// # Errors
///
/// - `400 Bad Request`: the product (or the session's user) no longer exists
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<Json<CartItemAddedResponse>> {
    let owner = User::find_by_id(&state.db, user.user_id).await?;
    let product = Product::find_by_id(&state.db, product_id).await?;

    let (Some(owner), Some(product)) = (owner, product) else {
        return Err(ApiError::BadRequest(
            "Failed to add item to the cart".to_string(),
        ));
    };

    let item = CartItem::create(&state.db, owner.id, product.id).await?;

    tracing::info!(
        cart_item_id = item.id,
        user_id = owner.id,
        product_id = product.id,
        "Item added to cart"
    );

    Ok(Json(CartItemAddedResponse {
        message: "Item added to the cart successfully".to_string(),
        id: item.id,
    }))
}

/// Removes one item from the caller's cart
///
/// Items belonging to other users are reported as not found.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(item_id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !CartItem::delete_for_user(&state.db, item_id, user.user_id).await? {
        return Err(ApiError::NotFound(
            "Failed to remove item from the cart".to_string(),
        ));
    }

    tracing::info!(cart_item_id = item_id, user_id = user.user_id, "Item removed from cart");

    Ok(Json(MessageResponse::new(
        "Item removed from the cart successfully",
    )))
}

/// Clears the caller's cart in a single transaction
///
/// Always succeeds, including when the cart was already empty. No order
/// record is created.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<CheckoutResponse>> {
    let mut tx = state.db.begin().await?;
    let removed = CartItem::delete_by_user(&mut tx, user.user_id).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.user_id, removed, "Checkout completed");

    Ok(Json(CheckoutResponse {
        message: "Checkout successful. Cart has been cleared".to_string(),
        removed,
    }))
}
