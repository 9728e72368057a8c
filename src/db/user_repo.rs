use sqlx::SqlitePool;

use super::{new_id, now};
use crate::models::{User, UserDraft};

pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    nome: String,
    cpf: String,
    telefone: String,
    email: String,
    funcao: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.nome,
            cpf: row.cpf,
            phone: row.telefone,
            email: row.email,
            role: row.funcao,
        }
    }
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, nome, cpf, telefone, email, funcao FROM usuarios ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, nome, cpf, telefone, email, funcao FROM usuarios WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    pub async fn create(&self, draft: &UserDraft) -> Result<User, sqlx::Error> {
        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO usuarios (id, nome, cpf, telefone, email, funcao, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.cpf)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.role)
        .bind(now())
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(&self, id: &str, draft: &UserDraft) -> Result<Option<User>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET nome = ?, cpf = ?, telefone = ?, email = ?, funcao = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.cpf)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.role)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
