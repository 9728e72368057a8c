//! Request handlers for `/api/produtos`, `/api/clientes` and `/api/usuarios`.
//!
//! Bodies are read with every field optional so that missing or negative
//! values produce a 400 with a readable message rather than a bare
//! deserialization failure. Validation reuses the operator forms.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{AppState, ServerError};
use crate::models::{Client, ClientDraft, Product, ProductDraft, Record, User, UserDraft};
use crate::sync::{ClientForm, Form, ProductForm, UserForm};

type ApiResult<T> = Result<T, ServerError>;

fn not_found<R: Record>(id: String) -> ServerError {
    ServerError::NotFound { kind: R::KIND, id }
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    nome: Option<String>,
    quantidade: Option<i64>,
    preco: Option<f64>,
    desconto: Option<f64>,
}

impl ProductBody {
    fn into_draft(self) -> ApiResult<ProductDraft> {
        let form = ProductForm {
            name: self.nome.unwrap_or_default(),
            quantity: self.quantidade,
            price: self.preco,
            discount: self.desconto,
        };
        Ok(form.validate()?)
    }
}

#[derive(Debug, Deserialize)]
pub struct ClientBody {
    nome: Option<String>,
    cpf: Option<String>,
    email: Option<String>,
    data_registro: Option<String>,
}

impl ClientBody {
    fn into_draft(self) -> ApiResult<ClientDraft> {
        let registered_on = match self.data_registro.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(date) => Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                ServerError::BadRequest(format!(
                    "Invalid registration date '{}' (expected YYYY-MM-DD)",
                    date
                ))
            })?),
        };
        let form = ClientForm {
            name: self.nome.unwrap_or_default(),
            cpf: self.cpf.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            registered_on,
        };
        Ok(form.validate()?)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserBody {
    nome: Option<String>,
    cpf: Option<String>,
    telefone: Option<String>,
    email: Option<String>,
    funcao: Option<String>,
}

impl UserBody {
    fn into_draft(self) -> ApiResult<UserDraft> {
        let form = UserForm {
            name: self.nome.unwrap_or_default(),
            cpf: self.cpf.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.telefone.unwrap_or_default(),
            role: self.funcao.unwrap_or_default(),
        };
        Ok(form.validate()?)
    }
}

// Products

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(body) = body?;
    let product = state.products.create(&body.into_draft()?).await?;
    tracing::info!("Created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductBody>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(body) = body?;
    let draft = body.into_draft()?;
    match state.products.update(&id, &draft).await? {
        Some(product) => Ok(Json(product)),
        None => Err(not_found::<Product>(id)),
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.products.delete(&id).await? {
        return Err(not_found::<Product>(id));
    }
    tracing::info!("Deleted product {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// Clients

pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.clients.list().await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    body: Result<Json<ClientBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let Json(body) = body?;
    let client = state.clients.create(&body.into_draft()?).await?;
    tracing::info!("Created client {}", client.id);
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ClientBody>, JsonRejection>,
) -> ApiResult<Json<Client>> {
    let Json(body) = body?;
    let draft = body.into_draft()?;
    match state.clients.update(&id, &draft).await? {
        Some(client) => Ok(Json(client)),
        None => Err(not_found::<Client>(id)),
    }
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.clients.delete(&id).await? {
        return Err(not_found::<Client>(id));
    }
    tracing::info!("Deleted client {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// Users

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(body) = body?;
    let user = state.users.create(&body.into_draft()?).await?;
    tracing::info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(body) = body?;
    let draft = body.into_draft()?;
    match state.users.update(&id, &draft).await? {
        Some(user) => Ok(Json(user)),
        None => Err(not_found::<User>(id)),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.users.delete(&id).await? {
        return Err(not_found::<User>(id));
    }
    tracing::info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}
