use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// National id (CPF).
    pub cpf: String,
    pub email: String,
    #[serde(rename = "data_registro")]
    pub registered_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientDraft {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    pub email: String,
    #[serde(rename = "data_registro")]
    pub registered_on: NaiveDate,
}

impl Record for Client {
    const COLLECTION: &'static str = "clientes";
    const KIND: &'static str = "client";

    type Draft = ClientDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ClientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            cpf: draft.cpf,
            email: draft.email,
            registered_on: draft.registered_on,
        }
    }

    fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            cpf: self.cpf.clone(),
            email: self.email.clone(),
            registered_on: self.registered_on,
        }
    }
}
