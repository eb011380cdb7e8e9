// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Quick recognition of Lottie inputs.
//!
//! A `.lottie` file is a ZIP container, recognized by its local file header
//! signature. A Lottie JSON document is recognized by its mandatory top level
//! fields; their values are not inspected. Use
//! [crate::validator::validate_lottie_json] for a full check.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

/// Local file header signature that every ZIP archive starts with (`PK\x03\x04`).
pub const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Top level keys every Lottie JSON document carries.
pub const LOTTIE_JSON_MANDATORY_FIELDS: [&str; 7] = ["v", "ip", "op", "layers", "fr", "w", "h"];

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid input type: expected a JSON object, got {0}")]
    InvalidInputType(&'static str),
}

/// Input accepted by [validate_file].
#[derive(Debug, Clone, Copy)]
pub enum FileData<'a> {
    /// Raw file contents, checked for the `.lottie` signature.
    Binary(&'a [u8]),
    /// JSON text, parsed and checked for the mandatory fields.
    Text(&'a str),
    /// An already parsed JSON value, checked for the mandatory fields.
    Json(&'a Value),
}

impl<'a> From<&'a [u8]> for FileData<'a> {
    fn from(data: &'a [u8]) -> Self {
        FileData::Binary(data)
    }
}

impl<'a> From<&'a Vec<u8>> for FileData<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        FileData::Binary(data)
    }
}

impl<'a> From<&'a str> for FileData<'a> {
    fn from(text: &'a str) -> Self {
        FileData::Text(text)
    }
}

impl<'a> From<&'a Value> for FileData<'a> {
    fn from(json: &'a Value) -> Self {
        FileData::Json(json)
    }
}

/// Input accepted by [is_lottie].
#[derive(Debug, Clone, Copy)]
pub enum LottieSource<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl<'a> From<&'a str> for LottieSource<'a> {
    fn from(text: &'a str) -> Self {
        LottieSource::Text(text)
    }
}

impl<'a> From<&'a Value> for LottieSource<'a> {
    fn from(json: &'a Value) -> Self {
        LottieSource::Json(json)
    }
}

/// Whether `data` starts with [ZIP_SIGNATURE]. Trailing bytes are ignored.
pub fn is_dot_lottie(data: &[u8]) -> bool {
    data.len() >= ZIP_SIGNATURE.len() && data.iter().zip(ZIP_SIGNATURE).all(|(a, b)| *a == b)
}

/// Whether `json` has every key in [LOTTIE_JSON_MANDATORY_FIELDS].
pub fn is_lottie_json(json: &Map<String, Value>) -> bool {
    LOTTIE_JSON_MANDATORY_FIELDS.iter().all(|field| json.contains_key(*field))
}

/// Whether `data` is a JSON object with the mandatory Lottie fields. Text that
/// isn't valid JSON, or isn't a JSON object, is logged and rejected.
pub fn is_lottie<'a>(data: impl Into<LottieSource<'a>>) -> bool {
    match data.into() {
        LottieSource::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => is_lottie_json(&object),
            Ok(other) => {
                error!("{}", FileError::InvalidInputType(json_type_name(&other)));
                false
            }
            Err(e) => {
                error!("Failed to parse Lottie JSON: {e}");
                false
            }
        },
        LottieSource::Json(json) => json.as_object().is_some_and(is_lottie_json),
    }
}

/// Like [validate_file], but returns the error instead of logging it.
pub fn try_validate_file<'a>(data: impl Into<FileData<'a>>) -> Result<bool, FileError> {
    match data.into() {
        FileData::Binary(bytes) => {
            debug!("Checking {} bytes for the .lottie signature", bytes.len());
            Ok(is_dot_lottie(bytes))
        }
        FileData::Text(text) => {
            debug!("Checking JSON text for the mandatory Lottie fields");
            let json: Value = serde_json::from_str(text)?;
            try_validate_file(&json)
        }
        FileData::Json(Value::Object(object)) => {
            debug!("Checking JSON object for the mandatory Lottie fields");
            Ok(is_lottie_json(object))
        }
        FileData::Json(other) => Err(FileError::InvalidInputType(json_type_name(other))),
    }
}

/// Whether `data` looks like a Lottie file: a `.lottie` container for binary
/// input, a JSON object with the mandatory fields otherwise. Never fails;
/// errors are logged and reported as `false`.
pub fn validate_file<'a>(data: impl Into<FileData<'a>>) -> bool {
    try_validate_file(data).unwrap_or_else(|e| {
        error!("Failed to validate Lottie file: {e}");
        false
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
