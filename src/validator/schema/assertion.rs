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

use super::format::Format;
use super::utils::TryValue;
use super::SchemaError::{self, UnexpectedValue};
use super::ValidationError;
use regex::Regex;
use serde_json::{Number, Value};
use std::{cmp::Ordering, collections::HashSet};

/// A type that can be used in [SchemaAssertion::Type].
#[derive(Debug, PartialEq)]
pub enum InstanceType {
    /// A [Value::Null].
    Null,
    /// A [Value::Bool].
    Boolean,
    /// A [Value::Object].
    Object,
    /// A [Value::Array].
    Array,
    /// A [Value::Number].
    Number,
    /// A [Value::Number] that represents an integer.
    Integer,
    /// A [Value::String].
    String,
}

impl InstanceType {
    pub fn name(&self) -> &'static str {
        match self {
            InstanceType::Null => "null",
            InstanceType::Boolean => "boolean",
            InstanceType::Object => "object",
            InstanceType::Array => "array",
            InstanceType::Number => "number",
            InstanceType::Integer => "integer",
            InstanceType::String => "string",
        }
    }
}

impl<'a> TryFrom<&'a str> for InstanceType {
    type Error = SchemaError<'a>;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        match s {
            "null" => Ok(InstanceType::Null),
            "boolean" => Ok(InstanceType::Boolean),
            "object" => Ok(InstanceType::Object),
            "array" => Ok(InstanceType::Array),
            "number" => Ok(InstanceType::Number),
            "integer" => Ok(InstanceType::Integer),
            "string" => Ok(InstanceType::String),
            _ => Err(SchemaError::UnknownInstanceType(s)),
        }
    }
}

impl PartialEq<Value> for InstanceType {
    fn eq(&self, other: &Value) -> bool {
        match self {
            InstanceType::Null => other.is_null(),
            InstanceType::Boolean => other.is_boolean(),
            InstanceType::Object => other.is_object(),
            InstanceType::Array => other.is_array(),
            InstanceType::Number => other.is_number(),
            InstanceType::Integer => {
                other.as_number().is_some_and(|n| n.as_f64().map_or(true, |n| n.fract() == 0.0))
            }
            InstanceType::String => other.is_string(),
        }
    }
}

/// An assertion. Each one only applies to the instance types it talks about
/// (e.g. `minimum` to numbers) and succeeds for any other type.
#[derive(Debug)]
pub enum SchemaAssertion<'a> {
    /// Succeeds if the type of the instance matches at least one of the given
    /// types.
    Type(Vec<InstanceType>),
    /// Succeeds if the instance is equal to one of the elements in this
    /// keyword’s array value.
    Enum(&'a Vec<Value>),
    /// Succeeds if the instance is equal to this keyword’s value.
    Const(&'a Value),
    /// Succeeds if the regular expression matches the string instance.
    Pattern(Regex),
    /// Succeeds if the string instance is in the given [Format].
    Format(Format),
    /// Succeeds if the numeric instance is greater than or equal to the given
    /// number.
    Minimum(&'a Number),
    /// Succeeds if the numeric instance is greater than the given number.
    ExclusiveMinimum(&'a Number),
    /// Succeeds if the numeric instance is less than or equal to the given
    /// number.
    Maximum(&'a Number),
    /// Succeeds if the numeric instance is less than the given number.
    ExclusiveMaximum(&'a Number),
    /// Succeeds if dividing the numeric instance by this number results in
    /// an integer.
    MultipleOf(&'a Number),
    /// Succeeds if the string instance has at least this many characters.
    MinLength(usize),
    /// Succeeds if the string instance has at most this many characters.
    MaxLength(usize),
    /// Succeeds if the instance array's size is less than, or equal to, the
    /// value of this keyword.
    MaxItems(usize),
    /// Succeeds if the instance array's size is greater than, or equal to, the
    /// value of this keyword.
    MinItems(usize),
    /// If `true`, the array instance validates successfully if all of its
    /// elements are unique.
    UniqueItems(bool),
    /// Succeeds if all of the listed properties are present on the instance
    /// object. Each missing property is reported separately.
    Required(Vec<&'a str>),
}

impl<'a> SchemaAssertion<'a> {
    /// Creates an [SchemaAssertion::Type] from a json [Value]. The [Value]
    /// should be a string or an array of strings.
    pub fn try_new_type(value: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::Type(match value {
            Value::String(str) => vec![str.as_str().try_into()?],
            Value::Array(arr) => {
                arr.iter().map(|s| s.try_str()?.try_into()).collect::<Result<Vec<_>, _>>()?
            }
            _ => return Err(UnexpectedValue { expected: "string or array", value }),
        }))
    }

    /// Creates an [SchemaAssertion::Enum] from a json [Value]. The [Value]
    /// should be a non-empty array (of any type).
    pub fn try_new_enum(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        let arr = v.try_array()?;
        if arr.is_empty() {
            Err(UnexpectedValue { expected: "non-empty array", value: v })
        } else {
            Ok(SchemaAssertion::Enum(arr))
        }
    }

    pub fn new_const(v: &'a Value) -> Self {
        SchemaAssertion::Const(v)
    }

    /// Creates an [SchemaAssertion::Pattern] from a json [Value]. The [Value]
    /// should be a valid regular expression string.
    pub fn try_new_pattern(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::Pattern(Regex::new(v.try_str()?)?))
    }

    /// Creates an [SchemaAssertion::Format] from a json [Value]. Returns
    /// `None` for formats that are not validated.
    pub fn try_new_format(v: &'a Value) -> Result<Option<Self>, SchemaError<'a>> {
        Ok(Format::from_name(v.try_str()?).map(SchemaAssertion::Format))
    }

    pub fn try_new_min(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::Minimum(v.try_number()?))
    }

    pub fn try_new_xmin(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::ExclusiveMinimum(v.try_number()?))
    }

    pub fn try_new_max(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::Maximum(v.try_number()?))
    }

    pub fn try_new_xmax(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::ExclusiveMaximum(v.try_number()?))
    }

    /// Creates an [SchemaAssertion::MultipleOf] from a json [Value]. The
    /// [Value] should be a number strictly greater than zero.
    pub fn try_new_multiple_of(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        let n = v.try_number()?;
        if n.as_f64().is_some_and(|f| f > 0.0) {
            Ok(SchemaAssertion::MultipleOf(n))
        } else {
            Err(UnexpectedValue { expected: "number greater than 0", value: v })
        }
    }

    pub fn try_new_min_length(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::MinLength(v.try_count()?))
    }

    pub fn try_new_max_length(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::MaxLength(v.try_count()?))
    }

    pub fn try_new_min_items(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::MinItems(v.try_count()?))
    }

    pub fn try_new_max_items(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::MaxItems(v.try_count()?))
    }

    pub fn try_new_unique_items(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::UniqueItems(v.try_bool()?))
    }

    /// Creates an [SchemaAssertion::Required] from a json [Value]. The [Value]
    /// should be an array of strings. Order is kept for error reporting.
    pub fn try_new_required(v: &'a Value) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaAssertion::Required(
            v.try_array()?.iter().map(|v| v.try_str()).collect::<Result<Vec<_>, _>>()?,
        ))
    }

    /// The keyword this assertion was created from.
    pub fn keyword(&self) -> &'static str {
        match self {
            SchemaAssertion::Type(_) => "type",
            SchemaAssertion::Enum(_) => "enum",
            SchemaAssertion::Const(_) => "const",
            SchemaAssertion::Pattern(_) => "pattern",
            SchemaAssertion::Format(_) => "format",
            SchemaAssertion::Minimum(_) => "minimum",
            SchemaAssertion::ExclusiveMinimum(_) => "exclusiveMinimum",
            SchemaAssertion::Maximum(_) => "maximum",
            SchemaAssertion::ExclusiveMaximum(_) => "exclusiveMaximum",
            SchemaAssertion::MultipleOf(_) => "multipleOf",
            SchemaAssertion::MinLength(_) => "minLength",
            SchemaAssertion::MaxLength(_) => "maxLength",
            SchemaAssertion::MaxItems(_) => "maxItems",
            SchemaAssertion::MinItems(_) => "minItems",
            SchemaAssertion::UniqueItems(_) => "uniqueItems",
            SchemaAssertion::Required(_) => "required",
        }
    }

    /// Validates `instance`, appending one [ValidationError] per violation to
    /// `errors`.
    pub fn validate<'i>(
        &self,
        instance: &'i Value,
        instance_path: &str,
        errors: &mut Vec<ValidationError<'i>>,
    ) {
        if let SchemaAssertion::Required(req) = self {
            if let Some(o) = instance.as_object() {
                errors.extend(req.iter().filter(|p| !o.contains_key(**p)).map(|p| {
                    ValidationError::new(
                        instance,
                        instance_path,
                        "required",
                        format!("must have required property '{p}'"),
                    )
                }));
            }
            return;
        }

        let valid = match self {
            SchemaAssertion::Type(vec) => vec.iter().any(|t| t == instance),
            SchemaAssertion::Enum(vec) => vec.contains(instance),
            SchemaAssertion::Const(value) => *value == instance,
            SchemaAssertion::Pattern(re) => instance.as_str().map_or(true, |s| re.is_match(s)),
            SchemaAssertion::Format(format) => {
                instance.as_str().map_or(true, |s| format.matches(s))
            }
            SchemaAssertion::Minimum(limit) => {
                instance.as_number().map_or(true, |n| compare(n, limit).is_some_and(|o| o.is_ge()))
            }
            SchemaAssertion::ExclusiveMinimum(limit) => {
                instance.as_number().map_or(true, |n| compare(n, limit).is_some_and(|o| o.is_gt()))
            }
            SchemaAssertion::Maximum(limit) => {
                instance.as_number().map_or(true, |n| compare(n, limit).is_some_and(|o| o.is_le()))
            }
            SchemaAssertion::ExclusiveMaximum(limit) => {
                instance.as_number().map_or(true, |n| compare(n, limit).is_some_and(|o| o.is_lt()))
            }
            SchemaAssertion::MultipleOf(divisor) => {
                instance.as_number().map_or(true, |n| is_multiple_of(n, divisor))
            }
            SchemaAssertion::MinLength(limit) => {
                instance.as_str().map_or(true, |s| s.chars().count() >= *limit)
            }
            SchemaAssertion::MaxLength(limit) => {
                instance.as_str().map_or(true, |s| s.chars().count() <= *limit)
            }
            SchemaAssertion::MaxItems(limit) => {
                instance.as_array().map_or(true, |a| a.len() <= *limit)
            }
            SchemaAssertion::MinItems(limit) => {
                instance.as_array().map_or(true, |a| a.len() >= *limit)
            }
            SchemaAssertion::UniqueItems(unique) => {
                let mut seen = HashSet::new();
                instance.as_array().map_or(true, |a| !unique || a.iter().all(|v| seen.insert(v)))
            }
            SchemaAssertion::Required(_) => true,
        };

        if !valid {
            errors.push(ValidationError::new(
                instance,
                instance_path,
                self.keyword(),
                self.failure_message(),
            ));
        }
    }

    fn failure_message(&self) -> String {
        match self {
            SchemaAssertion::Type(types) => {
                let names: Vec<_> = types.iter().map(InstanceType::name).collect();
                format!("must be {}", names.join(","))
            }
            SchemaAssertion::Enum(_) => "must be equal to one of the allowed values".to_owned(),
            SchemaAssertion::Const(_) => "must be equal to constant".to_owned(),
            SchemaAssertion::Pattern(re) => format!("must match pattern \"{}\"", re.as_str()),
            SchemaAssertion::Format(format) => format!("must match format \"{}\"", format.name()),
            SchemaAssertion::Minimum(limit) => format!("must be >= {limit}"),
            SchemaAssertion::ExclusiveMinimum(limit) => format!("must be > {limit}"),
            SchemaAssertion::Maximum(limit) => format!("must be <= {limit}"),
            SchemaAssertion::ExclusiveMaximum(limit) => format!("must be < {limit}"),
            SchemaAssertion::MultipleOf(divisor) => format!("must be multiple of {divisor}"),
            SchemaAssertion::MinLength(limit) => {
                format!("must NOT have fewer than {limit} characters")
            }
            SchemaAssertion::MaxLength(limit) => {
                format!("must NOT have more than {limit} characters")
            }
            SchemaAssertion::MaxItems(limit) => format!("must NOT have more than {limit} items"),
            SchemaAssertion::MinItems(limit) => format!("must NOT have fewer than {limit} items"),
            SchemaAssertion::UniqueItems(_) => "must NOT have duplicate items".to_owned(),
            SchemaAssertion::Required(_) => "must have required properties".to_owned(),
        }
    }
}

fn compare(left: &Number, right: &Number) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return Some(l.cmp(&r));
    }
    left.as_f64()?.partial_cmp(&right.as_f64()?)
}

fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(n), Some(d)) = (n.as_i64(), divisor.as_i64()) {
        return d != 0 && n.wrapping_rem(d) == 0;
    }
    match (n.as_f64(), divisor.as_f64()) {
        (Some(n), Some(d)) if d != 0.0 => {
            let q = n / d;
            q.is_finite() && (q - q.round()).abs() < 1e-9
        }
        _ => false,
    }
}
