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

use core::fmt;
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::applicator::SchemaApplicator;
use super::assertion::SchemaAssertion;
use super::pointer::{RefResolver, RefTarget};
use super::utils::TryValue;
use super::{SchemaError, ValidationError};

/// These keywords are ignored as they don't have an effect on the validation,
/// or (in case of `$defs`) they are indirectly used by other subschemas anyway.
const IGNORED_KEYWORDS: &[&str] = &[
    "title",
    "description",
    "default",
    "$comment",
    "$defs",
    "$version",
    "examples",
    "$id",
    "$schema",
    "$anchor",
    "deprecated",
    "readOnly",
    "writeOnly",
    "feature-code",
    "feature-level",
    "feature-details",
    "feature-link",
];

/// One of [SchemaAssertion], [SchemaApplicator] or [SchemaKeyword::Ref].
pub enum SchemaKeyword<'a> {
    /// A reference to another subschema.
    Ref(RefTarget<'a>),
    Assertion(SchemaAssertion<'a>),
    Applicator(SchemaApplicator<'a>),
}

impl fmt::Debug for SchemaKeyword<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Refs can loop back on themselves, so Debug can't be derived.
            SchemaKeyword::Ref(_) => f.write_str("$ref"),
            SchemaKeyword::Assertion(schema_assertion) => schema_assertion.fmt(f),
            SchemaKeyword::Applicator(schema_applicator) => schema_applicator.fmt(f),
        }
    }
}

/// Represents a subchema. Either a boolean or an object containing a list of
/// keywords to validate against.
#[derive(Debug)]
pub enum Subschema<'a> {
    /// An object subschema. The validation result of this subschema will be
    /// successful for an instance if **all** of the [SchemaKeyword]s in this
    /// subschema validate the given instance successfully.
    Object(Vec<SchemaKeyword<'a>>),
    /// A boolean subschema. Regardless of the instance content, the validation
    /// result is set by the boolean value of this subschema.
    Bool(bool),
}

impl<'a, 'b> Subschema<'a>
where
    'a: 'b,
{
    /// Creates a [Subschema] from a json [Value].
    pub fn from_json(
        input: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        match input {
            Value::Bool(b) => Ok(Subschema::Bool(*b)),
            Value::Object(map) => Ok(Self::from_object(map, ref_resolver)?),
            _ => Err(SchemaError::UnexpectedValue { expected: "object or boolean", value: input }),
        }
    }

    /// Validates a JSON instance against this subschema at a new instance
    /// location, e.g. after walking down a `properties` or `items` applicator.
    /// Returns whether no error was added.
    pub fn validate_at<'i>(
        &self,
        instance: &'i Value,
        instance_path: &str,
        errors: &mut Vec<ValidationError<'i>>,
    ) -> bool {
        self.continue_validation(instance, instance_path, &mut HashSet::new(), errors)
    }

    /// Continues validation of a JSON instance at the same location. On
    /// success, the properties this subschema evaluated are added to
    /// `evaluated_props`. Returns whether no error was added.
    pub fn continue_validation<'i>(
        &self,
        instance: &'i Value,
        instance_path: &str,
        evaluated_props: &mut HashSet<&'i str>,
        errors: &mut Vec<ValidationError<'i>>,
    ) -> bool {
        match self {
            Subschema::Bool(true) => true,
            Subschema::Bool(false) => {
                errors.push(ValidationError::new(
                    instance,
                    instance_path,
                    "false schema",
                    "boolean schema is false".to_owned(),
                ));
                false
            }
            Subschema::Object(vec) => {
                let error_count = errors.len();
                let mut validated_props = HashSet::new();
                let mut sub_evaluated_props = HashSet::new();
                for keyword in vec {
                    match keyword {
                        SchemaKeyword::Ref(r) => {
                            r.get()
                                .expect("Unresolved refs are not expected during validation.")
                                .continue_validation(
                                    instance,
                                    instance_path,
                                    &mut sub_evaluated_props,
                                    errors,
                                );
                        }
                        SchemaKeyword::Assertion(a) => a.validate(instance, instance_path, errors),
                        SchemaKeyword::Applicator(a) => a.validate(
                            instance,
                            instance_path,
                            &mut validated_props,
                            &mut sub_evaluated_props,
                            errors,
                        ),
                    }
                }
                let valid = errors.len() == error_count;
                if valid {
                    evaluated_props.extend(sub_evaluated_props);
                }
                valid
            }
        }
    }

    fn from_object(
        object_map: &'a Map<String, Value>,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        let mut result = vec![];
        let mut additional_props_kw = None;
        let mut unevaluated_props_kw = None;
        for (k, v) in object_map {
            let keyword = match k.as_str() {
                // Core
                "$ref" => SchemaKeyword::Ref(ref_resolver.resolve(v.try_str()?)?),
                // Assertions
                "type" => SchemaKeyword::Assertion(SchemaAssertion::try_new_type(v)?),
                "enum" => SchemaKeyword::Assertion(SchemaAssertion::try_new_enum(v)?),
                "const" => SchemaKeyword::Assertion(SchemaAssertion::new_const(v)),
                "pattern" => SchemaKeyword::Assertion(SchemaAssertion::try_new_pattern(v)?),
                "format" => match SchemaAssertion::try_new_format(v)? {
                    Some(a) => SchemaKeyword::Assertion(a),
                    None => continue, // unvalidated format, annotation only
                },
                "minimum" => SchemaKeyword::Assertion(SchemaAssertion::try_new_min(v)?),
                "exclusiveMinimum" => SchemaKeyword::Assertion(SchemaAssertion::try_new_xmin(v)?),
                "maximum" => SchemaKeyword::Assertion(SchemaAssertion::try_new_max(v)?),
                "exclusiveMaximum" => SchemaKeyword::Assertion(SchemaAssertion::try_new_xmax(v)?),
                "multipleOf" => {
                    SchemaKeyword::Assertion(SchemaAssertion::try_new_multiple_of(v)?)
                }
                "minLength" => SchemaKeyword::Assertion(SchemaAssertion::try_new_min_length(v)?),
                "maxLength" => SchemaKeyword::Assertion(SchemaAssertion::try_new_max_length(v)?),
                "minItems" => SchemaKeyword::Assertion(SchemaAssertion::try_new_min_items(v)?),
                "maxItems" => SchemaKeyword::Assertion(SchemaAssertion::try_new_max_items(v)?),
                "uniqueItems" => {
                    SchemaKeyword::Assertion(SchemaAssertion::try_new_unique_items(v)?)
                }
                "required" => SchemaKeyword::Assertion(SchemaAssertion::try_new_required(v)?),
                // Applicators
                "oneOf" => {
                    SchemaKeyword::Applicator(SchemaApplicator::try_new_one_of(v, ref_resolver)?)
                }
                "anyOf" => {
                    SchemaKeyword::Applicator(SchemaApplicator::try_new_any_of(v, ref_resolver)?)
                }
                "allOf" => {
                    SchemaKeyword::Applicator(SchemaApplicator::try_new_all_of(v, ref_resolver)?)
                }
                "not" => SchemaKeyword::Applicator(SchemaApplicator::try_new_not(v, ref_resolver)?),
                "if" => SchemaKeyword::Applicator(SchemaApplicator::try_new_if_then_else(
                    v,
                    object_map.get("then"),
                    object_map.get("else"),
                    ref_resolver,
                )?),
                "then" | "else" => continue, // handled in the if arm
                "properties" => SchemaKeyword::Applicator(SchemaApplicator::try_new_properties(
                    v,
                    ref_resolver,
                )?),
                "additionalProperties" => SchemaKeyword::Applicator(
                    SchemaApplicator::try_additional_properties(v, ref_resolver)?,
                ),
                "items" => {
                    SchemaKeyword::Applicator(SchemaApplicator::try_new_items(v, ref_resolver)?)
                }
                "unevaluatedProperties" => SchemaKeyword::Applicator(
                    SchemaApplicator::try_unevaluated_properties(v, ref_resolver)?,
                ),
                k if IGNORED_KEYWORDS.contains(&k) => continue,
                k => return Err(SchemaError::UnknownKeyword(k)),
            };
            match keyword {
                SchemaKeyword::Applicator(SchemaApplicator::AdditionalProperties(_)) => {
                    additional_props_kw = Some(keyword)
                }
                SchemaKeyword::Applicator(SchemaApplicator::UnevaluatedProperties(_)) => {
                    unevaluated_props_kw = Some(keyword)
                }
                _ => result.push(keyword),
            }
        }

        // additionalProperties needs every `properties` match, and
        // unevaluatedProperties needs every other keyword, so they go last (in that
        // order).
        result.extend(additional_props_kw);
        result.extend(unevaluated_props_kw);

        Ok(Subschema::Object(result))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn messages(v: &Value, instance: &Value) -> Vec<String> {
        let resolver = RefResolver::new(v);
        let s = Subschema::from_json(v, &resolver).unwrap();
        let mut errors = vec![];
        s.validate_at(instance, "", &mut errors);
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_read_bool_subschema() {
        let v = json!(true);
        assert!(matches!(
            Subschema::from_json(&v, &RefResolver::new(&v)),
            Ok(Subschema::Bool(true))
        ));
    }

    #[test]
    fn test_read_subschema_ignored_keyword() {
        let v = json!({IGNORED_KEYWORDS[0]: 42});
        assert!(matches!(Subschema::from_json(&v, &RefResolver::new(&v)), Ok(_)));
    }

    #[test]
    fn test_read_subschema_unknown_keyword() {
        let v = json!({"someKey": 42});
        assert!(matches!(
            Subschema::from_json(&v, &RefResolver::new(&v)),
            Err(SchemaError::UnknownKeyword("someKey"))
        ));
    }

    #[test]
    fn test_read_subschema_unknown_format_is_annotation() {
        let v = json!({"format": "hostname"});
        assert!(matches!(
            Subschema::from_json(&v, &RefResolver::new(&v)),
            Ok(Subschema::Object(k)) if k.is_empty()
        ));
    }

    #[test]
    fn test_read_subschema_invalid_value() {
        let v = json!(42);
        assert!(matches!(
            Subschema::from_json(&v, &RefResolver::new(&v)),
            Err(SchemaError::UnexpectedValue { .. })
        ));
    }

    #[test]
    fn test_false_subschema() {
        assert_eq!(messages(&json!(false), &json!(1)), ["data boolean schema is false"]);
    }

    #[test]
    fn test_collects_every_violation() {
        let v = json!({
            "type": "object",
            "properties": {
                "fr": {"type": "number", "exclusiveMinimum": 0},
                "layers": {"type": "array", "items": {"required": ["ty"]}}
            },
            "required": ["w", "h"]
        });

        assert_eq!(
            messages(&v, &json!({"fr": -1, "layers": [{}, {"ty": 4}, {}]})),
            [
                "data/fr must be > 0",
                "data/layers/0 must have required property 'ty'",
                "data/layers/2 must have required property 'ty'",
                "data must have required property 'w'",
                "data must have required property 'h'",
            ]
        );
    }

    #[test]
    fn test_non_object_root() {
        let v = json!({"type": "object", "required": ["w"]});
        assert_eq!(messages(&v, &json!("not a lottie")), ["data must be object"]);
    }

    #[test]
    fn test_evaluated_props_only_kept_on_success() {
        let v = json!({"properties": {"foo": {"type": "integer"}}});
        let resolver = RefResolver::new(&v);
        let s = Subschema::from_json(&v, &resolver).unwrap();

        let ok = json!({"foo": 1});
        let mut evaluated = HashSet::new();
        assert!(s.continue_validation(&ok, "", &mut evaluated, &mut vec![]));
        assert_eq!(evaluated, HashSet::from(["foo"]));

        let bad = json!({"foo": "1"});
        let mut evaluated = HashSet::new();
        assert!(!s.continue_validation(&bad, "", &mut evaluated, &mut vec![]));
        assert!(evaluated.is_empty());
    }
}
