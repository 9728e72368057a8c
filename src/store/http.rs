use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{RecordStore, StoreError};
use crate::models::Record;

/// Record store reached over the REST API (`/api/<collection>`).
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecordStore {
    /// Creates a store for the server at `server_url`.
    ///
    /// A bare `host:port` is treated as `http://host:port`.
    pub fn new(server_url: &str) -> Self {
        let trimmed = server_url.trim_end_matches('/');
        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: Record>(&self) -> String {
        format!("{}/api/{}", self.base_url, R::COLLECTION)
    }

    fn record_url<R: Record>(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url::<R>(),
            urlencoding::encode(id)
        )
    }
}

impl RecordStore for HttpRecordStore {
    async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let url = self.collection_url::<R>();
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        decode(check_status::<R>(response, None).await?).await
    }

    async fn create<R: Record>(&self, draft: &R::Draft) -> Result<R, StoreError> {
        let url = self.collection_url::<R>();
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        decode(check_status::<R>(response, None).await?).await
    }

    async fn update<R: Record>(&self, id: &str, draft: &R::Draft) -> Result<R, StoreError> {
        let url = self.record_url::<R>(id);
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        decode(check_status::<R>(response, Some(id)).await?).await
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        let url = self.record_url::<R>(id);
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status::<R>(response, Some(id)).await?;
        Ok(())
    }
}

/// Maps non-success statuses onto [`StoreError`].
///
/// `id` is the record the call was keyed by; only keyed calls report
/// `NotFound`.
async fn check_status<R: Record>(
    response: Response,
    id: Option<&str>,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(StoreError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            });
        }
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    if status == StatusCode::BAD_REQUEST {
        return Err(StoreError::Rejected(message));
    }

    Err(StoreError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

/// Extracts `message` from a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Product, User};

    #[test]
    fn test_collection_urls() {
        let store = HttpRecordStore::new("http://localhost:8080");
        assert_eq!(
            store.collection_url::<Product>(),
            "http://localhost:8080/api/produtos"
        );
        assert_eq!(
            store.collection_url::<Client>(),
            "http://localhost:8080/api/clientes"
        );
        assert_eq!(
            store.collection_url::<User>(),
            "http://localhost:8080/api/usuarios"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let store = HttpRecordStore::new("https://estoque.example.com/");
        assert_eq!(store.base_url(), "https://estoque.example.com");
    }

    #[test]
    fn test_bare_host_gets_http() {
        let store = HttpRecordStore::new("localhost:8080");
        assert_eq!(store.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_record_url_encodes_id() {
        let store = HttpRecordStore::new("http://localhost:8080");
        assert_eq!(
            store.record_url::<Product>("a b/c"),
            "http://localhost:8080/api/produtos/a%20b%2Fc"
        );
    }

    #[test]
    fn test_error_message_from_json() {
        let body = r#"{"error":"not_found","message":"Product not found"}"#;
        assert_eq!(error_message(body), "Product not found");
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("  boom \n"), "boom");
    }
}
