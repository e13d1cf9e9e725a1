/// Database models for Minishop
///
/// Each model exposes its CRUD operations as associated async functions
/// taking the pool (or a connection when the call must join a transaction).
///
/// # Models
///
/// - `user`: User accounts
/// - `product`: Catalog products
/// - `cart_item`: One unit of a product in a user's cart
///
/// # Example
///
/// ```no_run
/// use minishop_shared::models::product::{CreateProduct, Product};
/// use minishop_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let pen = Product::create(
///     &pool,
///     CreateProduct {
///         name: "Pen".to_string(),
///         price: 1.5,
///         description: String::new(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod cart_item;
pub mod product;
pub mod user;

/// Fresh migrated in-memory database for model tests
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    use crate::db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    };

    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("in-memory pool should open");
    run_migrations(&pool).await.expect("migrations should apply");
    pool
}
