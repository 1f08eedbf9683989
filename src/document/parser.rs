//! A module to parse stored documents

use std::error::Error;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::task::{Category, Task, TaskId};
use super::Document;
use super::{TITLE, DESCRIPTION, CATEGORY, IS_FINISHED, DATE_ADDED, DUE_DATE, DATE_FINISHED};

/// Title given to stored tasks that have none
const DEFAULT_TITLE: &str = "Untitled Task";

/// Extract the document ID, i.e. the last segment of a resource name
pub fn id_from_name(name: &str) -> Option<TaskId> {
    match name.rsplit('/').next() {
        Some(id) if id.is_empty() == false => Some(TaskId::from(id)),
        _ => None,
    }
}

/// Parse a stored document into the internal representation [`crate::Task`]
///
/// Missing fields get a default value. `now` is used as the creation date of documents that lack one.
pub fn parse(document: &Document, now: DateTime<Utc>) -> Result<Task, Box<dyn Error>> {
    let id = match document.name.as_deref().and_then(id_from_name) {
        Some(id) => id,
        None => return Err(format!("Document has no valid name: {:?}", document.name).into()),
    };
    let fields = &document.fields;

    let title = get_string(fields.get(TITLE), &id, TITLE)?
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let description = get_string(fields.get(DESCRIPTION), &id, DESCRIPTION)?
        .unwrap_or_default();
    let category = match get_string(fields.get(CATEGORY), &id, CATEGORY)? {
        None => None,
        Some(s) if s.is_empty() => None,
        Some(s) => match s.parse::<Category>() {
            Ok(cat) => Some(cat),
            Err(err) => {
                log::warn!("Task {}: {}. Considering it uncategorized", id, err);
                None
            },
        },
    };
    let is_finished = get_bool(fields.get(IS_FINISHED), &id, IS_FINISHED)?
        .unwrap_or(false);
    let date_added = get_timestamp(fields.get(DATE_ADDED), &id, DATE_ADDED)?
        .unwrap_or(now);
    let due_date = get_timestamp(fields.get(DUE_DATE), &id, DUE_DATE)?
        .unwrap_or(date_added);
    let date_finished = get_timestamp(fields.get(DATE_FINISHED), &id, DATE_FINISHED)?;

    Ok(Task::new_with_parameters(id, title, description, category, is_finished, date_added, due_date, date_finished))
}

/// Returns the single `(type, payload)` pair of a typed value, or `None` for absent and null values
fn typed_value<'a>(value: Option<&'a Value>, id: &TaskId, field: &str) -> Result<Option<(&'a str, &'a Value)>, Box<dyn Error>> {
    let obj = match value {
        None => return Ok(None),
        Some(Value::Object(obj)) => obj,
        Some(other) => return Err(format!("Task {}: field {} is not a typed value: {}", id, field, other).into()),
    };
    match obj.iter().next() {
        None => Ok(None),
        Some((kind, _)) if kind == "nullValue" => Ok(None),
        Some((kind, payload)) => Ok(Some((kind.as_str(), payload))),
    }
}

fn get_string(value: Option<&Value>, id: &TaskId, field: &str) -> Result<Option<String>, Box<dyn Error>> {
    match typed_value(value, id, field)? {
        None => Ok(None),
        Some(("stringValue", Value::String(s))) => Ok(Some(s.clone())),
        Some((kind, _)) => Err(format!("Task {}: field {} should be a string, got a {}", id, field, kind).into()),
    }
}

fn get_bool(value: Option<&Value>, id: &TaskId, field: &str) -> Result<Option<bool>, Box<dyn Error>> {
    match typed_value(value, id, field)? {
        None => Ok(None),
        Some(("booleanValue", Value::Bool(b))) => Ok(Some(*b)),
        Some((kind, _)) => Err(format!("Task {}: field {} should be a boolean, got a {}", id, field, kind).into()),
    }
}

fn get_timestamp(value: Option<&Value>, id: &TaskId, field: &str) -> Result<Option<DateTime<Utc>>, Box<dyn Error>> {
    match typed_value(value, id, field)? {
        None => Ok(None),
        Some(("timestampValue", Value::String(s))) => {
            let dt = DateTime::parse_from_rfc3339(s)
                .map_err(|err| format!("Task {}: invalid timestamp {:?} for {}: {}", id, s, field, err))?;
            Ok(Some(dt.with_timezone(&Utc)))
        },
        Some((kind, _)) => Err(format!("Task {}: field {} should be a timestamp, got a {}", id, field, kind).into()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::document::{fields_from_draft, Document};
    use crate::task::TaskDraft;

    fn document(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parse_full_document() {
        let doc = document(json!({
            "name": "projects/p/databases/(default)/documents/users/u1/tasks/abc123",
            "fields": {
                "title": { "stringValue": "Buy milk" },
                "description": { "stringValue": "2 liters" },
                "category": { "stringValue": "Shopping" },
                "isFinished": { "booleanValue": true },
                "dateAdded": { "timestampValue": "2024-05-30T18:00:00Z" },
                "dueDate": { "timestampValue": "2024-06-01T00:00:00.123456Z" },
                "dateFinished": { "nullValue": null },
            },
            "createTime": "2024-05-30T18:00:00.000001Z",
        }));

        let task = parse(&doc, Utc::now()).unwrap();
        assert_eq!(task.id().as_str(), "abc123");
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "2 liters");
        assert_eq!(task.category(), Some(Category::Shopping));
        assert!(task.is_finished());
        assert_eq!(task.date_added(), &Utc.ymd(2024, 5, 30).and_hms(18, 0, 0));
        assert_eq!(task.due_date(), &Utc.ymd(2024, 6, 1).and_hms_micro(0, 0, 0, 123456));
        assert_eq!(task.date_finished(), None);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let now = Utc.ymd(2024, 6, 2).and_hms(7, 0, 0);
        let doc = document(json!({
            "name": "projects/p/databases/(default)/documents/users/u1/tasks/bare",
            "fields": {
                "category": { "stringValue": "" },
            },
        }));

        let task = parse(&doc, now).unwrap();
        assert_eq!(task.title(), "Untitled Task");
        assert_eq!(task.description(), "");
        assert_eq!(task.category(), None);
        assert!(task.is_finished() == false);
        assert_eq!(task.date_added(), &now);
        assert_eq!(task.due_date(), &now);
    }

    #[test]
    fn unknown_category_is_uncategorized() {
        let doc = document(json!({
            "name": "a/b/tasks/x",
            "fields": { "category": { "stringValue": "Uncategorized" } },
        }));
        assert_eq!(parse(&doc, Utc::now()).unwrap().category(), None);
    }

    #[test]
    fn malformed_documents() {
        let nameless = document(json!({ "fields": {} }));
        assert!(parse(&nameless, Utc::now()).is_err());

        let wrong_type = document(json!({
            "name": "a/b/tasks/x",
            "fields": { "isFinished": { "stringValue": "yes" } },
        }));
        assert!(parse(&wrong_type, Utc::now()).is_err());

        let bad_date = document(json!({
            "name": "a/b/tasks/x",
            "fields": { "dueDate": { "timestampValue": "tomorrow" } },
        }));
        assert!(parse(&bad_date, Utc::now()).is_err());
    }

    #[test]
    fn built_documents_parse_back() {
        let mut draft = TaskDraft::new();
        draft.title = String::from("Call mom");
        draft.category = Some(Category::Personal);
        let mut doc = Document::with_fields(fields_from_draft(&draft));
        doc.name = Some(String::from("a/b/tasks/new"));

        let task = parse(&doc, Utc::now()).unwrap();
        assert_eq!(task.title(), "Call mom");
        assert_eq!(task.category(), Some(Category::Personal));
        assert_eq!(task.due_date().timestamp_micros(), draft.due_date.timestamp_micros());
    }

    #[test]
    fn ids_from_names() {
        assert_eq!(id_from_name("x/y/tasks/t1"), Some(TaskId::from("t1")));
        assert_eq!(id_from_name("t1"), Some(TaskId::from("t1")));
        assert_eq!(id_from_name("x/y/"), None);
    }
}
