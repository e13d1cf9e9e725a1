/// Product model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     price REAL NOT NULL CHECK (price >= 0),
///     description TEXT NOT NULL DEFAULT ''
/// );
/// ```
///
/// Deleting a product cascades to every cart item that references it.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unit price, never negative
    pub price: f64,

    /// Free-text description, empty when not provided
    pub description: String,
}

/// Input for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Input for a partial product update
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl UpdateProduct {
    /// Returns true when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.description.is_none()
    }
}

impl Product {
    /// Creates a new product and returns it with its generated ID
    pub async fn create(pool: &SqlitePool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description)
            VALUES (?, ?, ?)
            RETURNING id, name, price, description
            "#,
        )
        .bind(data.name)
        .bind(data.price)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Lists every product, ordered by ID
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Applies a partial update
    ///
    /// Only non-None fields in `data` are written. An empty update still
    /// reports whether the product exists.
    ///
    /// # Returns
    ///
    /// The updated product if found, None if it doesn't exist
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE products SET ");
        let mut assignments = query.separated(", ");

        if let Some(name) = data.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(price) = data.price {
            assignments.push("price = ").push_bind_unseparated(price);
        }
        if let Some(description) = data.description {
            assignments
                .push("description = ")
                .push_bind_unseparated(description);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING id, name, price, description");

        let product = query
            .build_query_as::<Product>()
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    /// Deletes a product by ID
    ///
    /// # Returns
    ///
    /// True if the product was deleted, false if it didn't exist
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
