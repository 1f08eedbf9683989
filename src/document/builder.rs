//! A module to build stored documents

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::task::{Category, TaskDraft, TaskUpdate};
use super::{TITLE, DESCRIPTION, CATEGORY, IS_FINISHED, DATE_ADDED, DUE_DATE, DATE_FINISHED};

/// Every field of a task that is about to be created
pub fn fields_from_draft(draft: &TaskDraft) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(TITLE.to_string(), string_value(&draft.title));
    fields.insert(DESCRIPTION.to_string(), string_value(&draft.description));
    fields.insert(CATEGORY.to_string(), category_value(draft.category));
    fields.insert(IS_FINISHED.to_string(), bool_value(draft.is_finished));
    fields.insert(DATE_ADDED.to_string(), timestamp_value(&draft.date_added));
    fields.insert(DUE_DATE.to_string(), timestamp_value(&draft.due_date));
    fields.insert(DATE_FINISHED.to_string(), optional_timestamp_value(draft.date_finished.as_ref()));
    fields
}

/// Only the fields a partial update writes
pub fn fields_from_update(update: &TaskUpdate) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(title) = &update.title {
        fields.insert(TITLE.to_string(), string_value(title));
    }
    if let Some(description) = &update.description {
        fields.insert(DESCRIPTION.to_string(), string_value(description));
    }
    if let Some(category) = update.category {
        fields.insert(CATEGORY.to_string(), category_value(category));
    }
    if let Some(due_date) = &update.due_date {
        fields.insert(DUE_DATE.to_string(), timestamp_value(due_date));
    }
    if let Some(is_finished) = update.is_finished {
        fields.insert(IS_FINISHED.to_string(), bool_value(is_finished));
    }
    if let Some(date_finished) = &update.date_finished {
        fields.insert(DATE_FINISHED.to_string(), optional_timestamp_value(date_finished.as_ref()));
    }
    fields
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn bool_value(b: bool) -> Value {
    json!({ "booleanValue": b })
}

fn null_value() -> Value {
    json!({ "nullValue": null })
}

fn category_value(category: Option<Category>) -> Value {
    match category {
        Some(cat) => string_value(cat.as_str()),
        None => null_value(),
    }
}

fn timestamp_value(dt: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": dt.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

fn optional_timestamp_value(dt: Option<&DateTime<Utc>>) -> Value {
    match dt {
        Some(dt) => timestamp_value(dt),
        None => null_value(),
    }
}
