// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use arrow_array::RecordBatch;
use arrow_schema::{FieldRef, Schema};
use serde::{Deserialize, Deserializer};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_json::{Map, Value};
use std::sync::Arc;

/// `{"d": ...}` envelope of odata=verbose responses
#[derive(Deserialize)]
pub(crate) struct Verbose<T> {
    pub d: T,
}

#[derive(Deserialize)]
pub(crate) struct Results<T> {
    pub results: Vec<T>,
    #[serde(rename = "__next")]
    pub next: Option<String>,
}

/// A file in a document library folder
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FileEntry {
    pub name: String,
    pub server_relative_url: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub length: u64,
    pub time_last_modified: String,
}

/// One page of list items, as returned by the server
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub rows: Vec<Map<String, Value>>,
}

impl ListPage {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as an Arrow batch, with `__metadata` and other `__` keys dropped
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        if self.rows.is_empty() {
            return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
        }

        let rows: Vec<Map<String, Value>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| !k.starts_with("__"))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect();

        let options = TracingOptions::default()
            .allow_null_fields(true)
            .coerce_numbers(true);
        let fields = Vec::<FieldRef>::from_samples(&rows, options)?;
        Ok(serde_arrow::to_record_batch(&fields, &rows)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientU64 {
    Number(u64),
    Text(String),
}

impl LenientU64 {
    fn value<E: serde::de::Error>(self) -> std::result::Result<u64, E> {
        match self {
            LenientU64::Number(n) => Ok(n),
            LenientU64::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

/// SharePoint verbose JSON sends many numbers as strings
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    LenientU64::deserialize(deserializer)?.value()
}

/// Like `lenient_u64`, with an explicit `null` read as `None`
pub(crate) fn lenient_u64_opt<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LenientU64>::deserialize(deserializer)?
        .map(LenientU64::value)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(rows: Vec<Value>) -> ListPage {
        ListPage {
            rows: rows
                .into_iter()
                .filter_map(|v| v.as_object().cloned())
                .collect(),
        }
    }

    #[test]
    fn test_file_entry_with_string_length() {
        let entry: FileEntry = serde_json::from_value(json!({
            "Name": "report.csv",
            "ServerRelativeUrl": "/sites/data/Shared Documents/report.csv",
            "Length": "2048",
            "TimeLastModified": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(entry.length, 2048);
    }

    #[test]
    fn test_page_to_record_batch() {
        let page = page(vec![
            json!({"__metadata": {"type": "SP.Data.ItemsListItem"}, "Title": "first", "Id": 1}),
            json!({"__metadata": {"type": "SP.Data.ItemsListItem"}, "Title": "second", "Id": 2}),
        ]);
        let batch = page.to_record_batch().unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert!(batch.schema().field_with_name("__metadata").is_err());

        assert!(batch.schema().field_with_name("Title").is_ok());
        assert!(batch.schema().field_with_name("Id").unwrap().data_type().is_integer());

        let rendered = arrow::util::pretty::pretty_format_batches(&[batch]).unwrap().to_string();
        assert!(rendered.contains("first"));
        assert!(rendered.contains("second"));
    }

    #[test]
    fn test_empty_page() {
        let batch = ListPage::default().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
