/// Cart item model and database operations
///
/// A cart item says "this user has one unit of this product in their cart".
/// There is no quantity column: adding the same product twice creates two
/// rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cart_items (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     product_id INTEGER NOT NULL REFERENCES products (id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

/// Cart item row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    /// Unique cart item ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Product in the cart
    pub product_id: i64,

    /// When the item was added
    pub created_at: DateTime<Utc>,
}

/// Cart item joined with the product it refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_price: f64,
}

impl CartItem {
    /// Adds one unit of a product to a user's cart
    ///
    /// Both references must exist; the foreign keys reject dangling IDs.
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        product_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (user_id, product_id)
            VALUES (?, ?)
            RETURNING id, user_id, product_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds a cart item by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, created_at
            FROM cart_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists a user's cart items together with product name and price
    ///
    /// Ordered by cart item ID (insertion order).
    pub async fn list_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.id, c.user_id, c.product_id,
                   p.name AS product_name, p.price AS product_price
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(lines)
    }

    /// Deletes a single cart item owned by `user_id`
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if no such item exists for this user
    pub async fn delete_for_user(
        pool: &SqlitePool,
        id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every cart item of a user
    ///
    /// Takes a connection so the caller can run it inside a transaction.
    ///
    /// # Returns
    ///
    /// Number of rows removed
    pub async fn delete_by_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        product::{CreateProduct, Product},
        test_pool,
        user::{CreateUser, User},
    };

    async fn seed(pool: &SqlitePool) -> (User, User, Product) {
        let alice = User::create(
            pool,
            CreateUser {
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        let bob = User::create(
            pool,
            CreateUser {
                username: "bob".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        let pen = Product::create(
            pool,
            CreateProduct {
                name: "Pen".to_string(),
                price: 1.5,
                description: String::new(),
            },
        )
        .await
        .unwrap();

        (alice, bob, pen)
    }

    #[tokio::test]
    async fn test_same_product_twice_creates_distinct_rows() {
        let pool = test_pool().await;
        let (alice, _, pen) = seed(&pool).await;

        let first = CartItem::create(&pool, alice.id, pen.id).await.unwrap();
        let second = CartItem::create(&pool, alice.id, pen.id).await.unwrap();
        assert_ne!(first.id, second.id);

        let lines = CartItem::list_by_user(&pool, alice.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.product_id == pen.id));
        assert_eq!(lines[0].product_name, "Pen");
        assert_eq!(lines[0].product_price, 1.5);
    }

    #[tokio::test]
    async fn test_dangling_product_is_rejected() {
        let pool = test_pool().await;
        let (alice, _, _) = seed(&pool).await;

        assert!(CartItem::create(&pool, alice.id, 999).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_for_user_respects_owner() {
        let pool = test_pool().await;
        let (alice, bob, pen) = seed(&pool).await;

        let item = CartItem::create(&pool, alice.id, pen.id).await.unwrap();

        assert!(!CartItem::delete_for_user(&pool, item.id, bob.id).await.unwrap());
        assert!(CartItem::delete_for_user(&pool, item.id, alice.id).await.unwrap());
        assert!(CartItem::find_by_id(&pool, item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_user_leaves_other_carts() {
        let pool = test_pool().await;
        let (alice, bob, pen) = seed(&pool).await;

        CartItem::create(&pool, alice.id, pen.id).await.unwrap();
        CartItem::create(&pool, alice.id, pen.id).await.unwrap();
        let bobs = CartItem::create(&pool, bob.id, pen.id).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let removed = CartItem::delete_by_user(&mut tx, alice.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(removed, 2);
        assert!(CartItem::list_by_user(&pool, alice.id).await.unwrap().is_empty());
        assert!(CartItem::find_by_id(&pool, bobs.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_to_cart() {
        let pool = test_pool().await;
        let (alice, _, pen) = seed(&pool).await;

        let item = CartItem::create(&pool, alice.id, pen.id).await.unwrap();
        Product::delete(&pool, pen.id).await.unwrap();

        assert!(CartItem::find_by_id(&pool, item.id).await.unwrap().is_none());
    }
}
