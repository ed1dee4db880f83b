use serde::{Deserialize, Serialize};

use super::pdf::{DocumentType, Table};
use crate::error::ValidationErrors;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

/// Parsed filing returned by the documents endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JusticeDocument {
    pub ico: String,
    pub document_id: String,
    pub document_type: DocumentType,
    pub text_content: String,
    pub tables: Vec<Table>,
    pub table_count: usize,
    pub source_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub ico: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetQuery {
    pub dataset_url: Option<String>,
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> String {
    match value.map(str::trim) {
        None => {
            errors.add(field, REQUIRED);
            String::new()
        }
        Some("") => {
            errors.add(field, BLANK);
            String::new()
        }
        Some(value) => value.to_string(),
    }
}

impl DocumentQuery {
    /// `(ico, document_id)` once both are present.
    pub fn validate(&self) -> Result<(String, String), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let ico = required(&mut errors, "ico", self.ico.as_deref());
        let document_id = required(&mut errors, "document_id", self.document_id.as_deref());
        errors.finish()?;
        Ok((ico, document_id))
    }
}

impl DatasetQuery {
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let url = required(&mut errors, "dataset_url", self.dataset_url.as_deref());
        errors.finish()?;
        Ok(url)
    }
}
