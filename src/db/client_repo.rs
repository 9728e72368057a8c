use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{new_id, now};
use crate::models::{Client, ClientDraft};

pub struct ClientRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: String,
    nome: String,
    cpf: String,
    email: String,
    data_registro: String,
}

impl TryFrom<ClientRow> for Client {
    type Error = sqlx::Error;

    fn try_from(row: ClientRow) -> Result<Self, sqlx::Error> {
        let registered_on = NaiveDate::parse_from_str(&row.data_registro, "%Y-%m-%d")
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Client {
            id: row.id,
            name: row.nome,
            cpf: row.cpf,
            email: row.email,
            registered_on,
        })
    }
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Client>, sqlx::Error> {
        let rows: Vec<ClientRow> = sqlx::query_as(
            "SELECT id, nome, cpf, email, data_registro FROM clientes ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Client::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Client>, sqlx::Error> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, nome, cpf, email, data_registro FROM clientes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Client::try_from).transpose()
    }

    pub async fn create(&self, draft: &ClientDraft) -> Result<Client, sqlx::Error> {
        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO clientes (id, nome, cpf, email, data_registro, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.cpf)
        .bind(&draft.email)
        .bind(draft.registered_on.format("%Y-%m-%d").to_string())
        .bind(now())
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        &self,
        id: &str,
        draft: &ClientDraft,
    ) -> Result<Option<Client>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clientes SET nome = ?, cpf = ?, email = ?, data_registro = ? WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(&draft.cpf)
        .bind(&draft.email)
        .bind(draft.registered_on.format("%Y-%m-%d").to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
