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

//! Full schema validation of Lottie JSON documents.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

mod schema;
pub use schema::{Schema, SchemaError, ValidationError, ValidationErrors};

/// The Lottie schema shipped with this crate.
pub const BUNDLED_SCHEMA: &str = include_str!("../data/lottie.schema.json");

static BUNDLED_DOCUMENT: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(BUNDLED_SCHEMA)
        .unwrap_or_else(|e| panic!("Bundled Lottie schema is not valid JSON: {e}"))
});

static BUNDLED_VALIDATOR: LazyLock<LottieValidator<'static>> = LazyLock::new(|| {
    LottieValidator::new(&BUNDLED_DOCUMENT)
        .unwrap_or_else(|e| panic!("Bundled Lottie schema failed to compile: {e}"))
});

/// Outcome of a schema validation. Serializes as
/// `{"isValid": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Every violated constraint, joined with `", "`. Only set when
    /// `is_valid` is `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult { is_valid: true, error: None }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        ValidationResult { is_valid: false, error: Some(error.into()) }
    }
}

impl From<Result<(), ValidationErrors<'_>>> for ValidationResult {
    fn from(result: Result<(), ValidationErrors<'_>>) -> Self {
        match result {
            Ok(()) => ValidationResult::valid(),
            Err(errors) => ValidationResult::invalid(errors.to_string()),
        }
    }
}

/// A compiled Lottie schema. Compile once and share it; validation only reads
/// from it.
pub struct LottieValidator<'a> {
    schema: Schema<'a>,
}

impl<'a> LottieValidator<'a> {
    /// Compiles `schema` into a validator.
    ///
    /// Recursive `$ref`s compile into a reference cycle, so the compiled
    /// schema is never freed. Compile a schema once and keep the validator.
    pub fn new(schema: &'a Value) -> Result<Self, SchemaError<'a>> {
        let schema = Schema::from_json(schema)?;
        debug!("Compiled Lottie schema");
        Ok(LottieValidator { schema })
    }

    /// The validator for the bundled Lottie schema. The schema is compiled the
    /// first time this is called.
    ///
    /// # Panics
    ///
    /// If the bundled schema can't be compiled.
    pub fn bundled() -> &'static LottieValidator<'static> {
        &BUNDLED_VALIDATOR
    }

    /// Validates `value`, reporting every violation.
    ///
    /// ```
    /// # use serde_json::json;
    /// # use lottie_validator::validator::LottieValidator;
    /// let result = LottieValidator::bundled().validate(&json!("not a lottie"));
    /// assert!(!result.is_valid);
    /// assert_eq!(result.error.as_deref(), Some("data must be object"));
    /// ```
    pub fn validate(&self, value: &Value) -> ValidationResult {
        self.schema.validate(value).into()
    }

    /// Validates `value`, returning the individual violations.
    pub fn validate_detailed<'i>(&self, value: &'i Value) -> Result<(), ValidationErrors<'i>> {
        self.schema.validate(value)
    }
}

/// Validates a JSON value against the bundled Lottie schema.
pub fn validate_lottie_json(value: &Value) -> ValidationResult {
    LottieValidator::bundled().validate(value)
}
