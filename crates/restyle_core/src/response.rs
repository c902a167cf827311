use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Filename used when a file response carries no content-disposition name.
pub const DEFAULT_FILE_FILENAME: &str = "download.html";

/// Filename used by the repeat-download action when the response named none.
pub const DEFAULT_DOWNLOAD_AGAIN_FILENAME: &str = "download.txt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a JSON object, got {found}")]
pub struct ResponseShapeError {
    found: &'static str,
}

/// JSON status object returned by the remote service.
///
/// Parsing is lenient: `success` counts as true only when truthy, and the
/// text fields are read only when they hold strings. `raw` keeps the object
/// exactly as received (key order included) for the raw-JSON display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct ApiResponse {
    pub success: bool,
    pub message: Option<String>,
    pub download_url: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
    /// The received object; `Null` for responses built locally.
    pub raw: Value,
}

impl TryFrom<Value> for ApiResponse {
    type Error = ResponseShapeError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = &raw else {
            return Err(ResponseShapeError {
                found: kind_name(&raw),
            });
        };
        Ok(Self {
            success: fields.get("success").is_some_and(is_truthy),
            message: text_field(fields, "message"),
            download_url: text_field(fields, "download_url"),
            filename: text_field(fields, "filename"),
            error: text_field(fields, "error"),
            raw,
        })
    }
}

impl ApiResponse {
    /// The confirmation synthesized after a file payload was saved.
    pub fn file_saved(filename: &str) -> Self {
        Self {
            success: true,
            message: Some(file_saved_message(filename)),
            filename: Some(filename.to_owned()),
            ..Self::default()
        }
    }

    /// Compact JSON of the response as received, or of the known fields when
    /// it was built locally.
    pub fn to_json(&self) -> String {
        if !self.raw.is_null() {
            return self.raw.to_string();
        }
        let mut fields = Map::new();
        fields.insert("success".to_owned(), json!(self.success));
        for (key, value) in [
            ("message", &self.message),
            ("download_url", &self.download_url),
            ("filename", &self.filename),
            ("error", &self.error),
        ] {
            if let Some(value) = value {
                fields.insert(key.to_owned(), json!(value));
            }
        }
        Value::Object(fields).to_string()
    }
}

pub fn file_saved_message(filename: &str) -> String {
    format!("File \"{filename}\" downloaded successfully!")
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Outcome of one submission as reported back to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// A file payload was written to disk.
    Saved { filename: String, path: PathBuf },
    /// A JSON status object, adopted as-is.
    Status(ApiResponse),
    /// The request failed; the message is shown verbatim.
    Failed(String),
}
