//! Supporting documents attached to a case.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::id_from_any;

/// Category of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    BoardingPass,
    Reservation,
    IdDocument,
    Contract,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardingPass => "BOARDING_PASS",
            Self::Reservation => "RESERVATION",
            Self::IdDocument => "ID_DOCUMENT",
            Self::Contract => "CONTRACT",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub case_id: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_json() {
        let doc: Document = serde_json::from_str(
            r#"{"id": 3, "name": "pass.pdf", "type": "BOARDING_PASS", "caseId": 12}"#,
        )
        .unwrap();
        assert_eq!(doc.id, "3");
        assert_eq!(doc.document_type, Some(DocumentType::BoardingPass));
        assert_eq!(DocumentType::IdDocument.to_string(), "ID_DOCUMENT");
    }
}
