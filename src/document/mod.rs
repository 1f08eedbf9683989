//! This module handles conversion between stored documents and internal representations
//!
//! Documents are JSON objects whose `fields` map each field name to a typed value (e.g. `{"stringValue": "..."}`).
//! Timestamps are converted to and from [`chrono::DateTime<Utc>`] here, and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod parser;
pub use parser::{parse, id_from_name};
mod builder;
pub use builder::{fields_from_draft, fields_from_update};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";
pub const IS_FINISHED: &str = "isFinished";
pub const DATE_ADDED: &str = "dateAdded";
pub const DUE_DATE: &str = "dueDate";
pub const DATE_FINISHED: &str = "dateFinished";

/// A stored document, as sent and received by the document store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name, ending with the document ID. Absent in creation requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn with_fields(fields: Map<String, Value>) -> Self {
        Self { name: None, fields }
    }
}

/// One page of a collection listing
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}
