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

//! Representation of a JSON Schema. This is built to be used for the Lottie
//! schema. As a result some assumptions have been made and features that are
//! not used by the Lottie schema might not be implemented.
//!
//! Validation always runs to completion and reports every violated
//! constraint, not only the first one.

use std::fmt;

use pointer::RefResolver;
use serde_json::Value;
use subschema::Subschema;
use thiserror::Error;

mod applicator;
mod assertion;
mod format;
mod pointer;
mod subschema;
mod utils;

#[derive(Debug, Error)]
pub enum SchemaError<'a> {
    #[error("Unknown instance type <{0}>.")]
    UnknownInstanceType(&'a str),
    #[error("Expected {expected}, but received <{value}>.")]
    UnexpectedValue { expected: &'a str, value: &'a Value },
    #[error("Unknown keyword <{0}>.")]
    UnknownKeyword(&'a str),
    #[error(transparent)]
    RegexError(#[from] regex::Error),
    #[error("Failed to resolve pointer <{0}>")]
    UnresolvableRef(&'a str),
}

/// A single violated constraint.
///
/// Displayed as `data<pointer> <message>`, e.g. `data/fr must be number`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("data{instance_path} {message}")]
pub struct ValidationError<'i> {
    instance: &'i Value,
    instance_path: String,
    keyword: &'static str,
    message: String,
}

impl<'i> ValidationError<'i> {
    pub(crate) fn new(
        instance: &'i Value,
        instance_path: &str,
        keyword: &'static str,
        message: String,
    ) -> Self {
        ValidationError { instance, instance_path: instance_path.to_owned(), keyword, message }
    }

    /// The instance node that failed to validate.
    pub fn instance(&self) -> &'i Value {
        self.instance
    }

    /// JSON pointer to the failing instance node. Empty for the root.
    pub fn instance_path(&self) -> &str {
        &self.instance_path
    }

    /// The schema keyword that reported the failure.
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// All the constraints an instance violated, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors<'i>(Vec<ValidationError<'i>>);

impl<'i> ValidationErrors<'i> {
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError<'i>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors<'_> {}

impl<'i> IntoIterator for ValidationErrors<'i> {
    type Item = ValidationError<'i>;
    type IntoIter = std::vec::IntoIter<ValidationError<'i>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Represents a compiled schema file.
pub struct Schema<'a> {
    root_subschema: Subschema<'a>,
}

impl<'a> Schema<'a> {
    /// Creates a new [Schema] from a root [Value]. The result can be later
    /// used to validate JSON instances against this schema.
    ///
    /// ```
    /// # use serde_json::json;
    /// # use lottie_validator::validator::Schema;
    /// let s = Schema::from_json(&json!(true)).unwrap();
    /// assert!(s.validate(&json!(42)).is_ok());
    /// ```
    pub fn from_json(input: &'a Value) -> Result<Self, SchemaError<'a>> {
        let ref_resolver = RefResolver::new(input);
        let root_subschema = Subschema::from_json(input, &ref_resolver)?;

        Ok(Schema { root_subschema })
    }

    /// Validates a JSON [Value] against this [Schema], collecting every
    /// violation.
    ///
    /// ```
    /// # use serde_json::json;
    /// # use lottie_validator::validator::Schema;
    /// let schema = json!({"type": "object", "required": ["w", "h"]});
    /// let s = Schema::from_json(&schema).unwrap();
    /// let instance = json!({});
    /// let errors = s.validate(&instance).unwrap_err();
    /// assert_eq!(
    ///     errors.to_string(),
    ///     "data must have required property 'w', data must have required property 'h'"
    /// );
    /// ```
    pub fn validate<'i>(&self, instance: &'i Value) -> Result<(), ValidationErrors<'i>> {
        let mut errors = vec![];
        self.root_subschema.validate_at(instance, "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Returns whether `instance` is valid against this [Schema].
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_ok()
    }
}
