use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    pub email: String,
    /// Free-text job role.
    #[serde(rename = "funcao", default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDraft {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    pub email: String,
    #[serde(rename = "funcao", default)]
    pub role: String,
}

impl Record for User {
    const COLLECTION: &'static str = "usuarios";
    const KIND: &'static str = "user";

    type Draft = UserDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            cpf: draft.cpf,
            phone: draft.phone,
            email: draft.email,
            role: draft.role,
        }
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            cpf: self.cpf.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default_empty() {
        let json = r#"{"_id":"u1","nome":"Bruno","cpf":"111","email":"b@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.phone, "");
        assert_eq!(user.role, "");

        let value = serde_json::to_value(user.to_draft()).unwrap();
        assert_eq!(value["telefone"], "");
        assert_eq!(value["funcao"], "");
    }
}
