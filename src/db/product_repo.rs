use sqlx::SqlitePool;

use super::{new_id, now};
use crate::models::{Product, ProductDraft};

pub struct ProductRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    nome: String,
    quantidade: i64,
    preco: f64,
    desconto: f64,
}

impl TryFrom<ProductRow> for Product {
    type Error = sqlx::Error;

    fn try_from(row: ProductRow) -> Result<Self, sqlx::Error> {
        let quantity =
            u32::try_from(row.quantidade).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Product {
            id: row.id,
            name: row.nome,
            quantity,
            price: row.preco,
            discount: row.desconto,
        })
    }
}

const SELECT: &str = "SELECT id, nome, quantidade, preco, desconto FROM produtos";

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products in insertion order.
    pub async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        let sql = format!("{} ORDER BY created_at, rowid", SELECT);
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Product>, sqlx::Error> {
        let sql = format!("{} WHERE id = ?", SELECT);
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Product::try_from).transpose()
    }

    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, sqlx::Error> {
        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO produtos (id, nome, quantidade, preco, desconto, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(i64::from(draft.quantity))
        .bind(draft.price)
        .bind(draft.discount)
        .bind(now())
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Replaces every field. Returns `None` if no product has this id.
    pub async fn update(
        &self,
        id: &str,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE produtos SET nome = ?, quantidade = ?, preco = ?, desconto = ? WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(i64::from(draft.quantity))
        .bind(draft.price)
        .bind(draft.discount)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Returns `false` if no product has this id.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
