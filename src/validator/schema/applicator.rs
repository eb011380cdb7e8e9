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

use super::pointer::RefResolver;
use super::utils::{push_pointer, TryValue};
use super::{subschema::Subschema, SchemaError, ValidationError};
use serde_json::Value;
use std::collections::HashSet;

/// An applicator
#[derive(Debug)]
pub enum SchemaApplicator<'a> {
    /// Succeeds if exactly one of the subschemas defined by this keyword’s
    /// value succeed.
    OneOf(Vec<Subschema<'a>>),
    /// Succeeds if at least one of the subschemas defined by this keyword’s
    /// value succeed.
    AnyOf(Vec<Subschema<'a>>),
    /// Succeeds if all of the subschemas defined by this keyword’s value
    /// succeed.
    AllOf(Vec<Subschema<'a>>),
    /// If the `if` subschema succeeds, the validation succeeds
    /// if the instance validates against the `then` subschema successfully
    /// too (or if the `then` subschema is unavailable). Otherwise (when
    /// `if` subschema validation fails) it'll succeed if the instance validates
    /// against the `else` subschema successfully (or if the `else` subschema is
    /// unavailable).
    IfThenElse(Subschema<'a>, Option<Subschema<'a>>, Option<Subschema<'a>>),
    /// Succeeds if the instance fails to validate against the subschema.
    Not(Subschema<'a>),
    /// Succeds if all of the properties in the instance validate against their
    /// corresponding subschema from this keyword (if they have one). Kept in
    /// schema order so errors are reported deterministically.
    Properties(Vec<(&'a str, Subschema<'a>)>),
    /// Succeeds if the subschema validates against each value not matched by
    /// other object applicators.
    AdditionalProperties(Subschema<'a>),
    /// Succeeds if each item in the instance array validates against this
    /// subschema.
    Items(Subschema<'a>),
    /// Succeeds if the subschema validates against each value not matched by
    /// other object applicators (or their valid children).
    UnevaluatedProperties(Subschema<'a>),
}

impl<'a, 'b> SchemaApplicator<'a> {
    /// Creates an [SchemaApplicator::OneOf] from a json [Value]. The
    /// [Value] should be a non-empty array of valid subschemas.
    pub fn try_new_one_of(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::OneOf(Self::subschema_list(value, ref_resolver)?))
    }

    /// Creates an [SchemaApplicator::AnyOf] from a json [Value]. The
    /// [Value] should be a non-empty array of valid subschemas.
    pub fn try_new_any_of(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::AnyOf(Self::subschema_list(value, ref_resolver)?))
    }

    /// Creates an [SchemaApplicator::AllOf] from a json [Value]. The
    /// [Value] should be a non-empty array of valid subschemas.
    pub fn try_new_all_of(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::AllOf(Self::subschema_list(value, ref_resolver)?))
    }

    /// Creates an [SchemaApplicator::IfThenElse] from if/then/else [Value]s
    /// from an object map. The three [Value]s (if present) should be
    /// valid subschemas.
    pub fn try_new_if_then_else(
        if_value: &'a Value,
        then_value: Option<&'a Value>,
        else_value: Option<&'a Value>,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::IfThenElse(
            Subschema::from_json(if_value, ref_resolver)?,
            then_value.map(|v| Subschema::from_json(v, ref_resolver)).transpose()?,
            else_value.map(|v| Subschema::from_json(v, ref_resolver)).transpose()?,
        ))
    }

    pub fn try_new_not(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::Not(Subschema::from_json(value, ref_resolver)?))
    }

    /// Creates an [SchemaApplicator::Properties] from a json [Value]. The
    /// [Value] should be an object where each of its value is a json
    /// subschema.
    pub fn try_new_properties(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::Properties(
            value
                .try_object()?
                .iter()
                .map(|(k, v)| Subschema::from_json(v, ref_resolver).map(|s| (k.as_str(), s)))
                .collect::<Result<Vec<_>, _>>()?,
        ))
    }

    pub fn try_additional_properties(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::AdditionalProperties(Subschema::from_json(value, ref_resolver)?))
    }

    pub fn try_new_items(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::Items(Subschema::from_json(value, ref_resolver)?))
    }

    pub fn try_unevaluated_properties(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Self, SchemaError<'a>> {
        Ok(SchemaApplicator::UnevaluatedProperties(Subschema::from_json(value, ref_resolver)?))
    }

    fn subschema_list(
        value: &'a Value,
        ref_resolver: &'b RefResolver<'a>,
    ) -> Result<Vec<Subschema<'a>>, SchemaError<'a>> {
        value
            .try_array()?
            .iter()
            .map(|v| Subschema::from_json(v, ref_resolver))
            .collect::<Result<Vec<_>, _>>()
    }

    /// Validates `instance`, appending every violation to `errors`.
    ///
    /// `validated_props` collects the properties matched by `properties` (used
    /// by `additionalProperties`), `evaluated_props` the ones successfully
    /// evaluated so far at this location (used by `unevaluatedProperties`).
    pub fn validate<'i>(
        &self,
        instance: &'i Value,
        instance_path: &str,
        validated_props: &mut HashSet<&'i str>,
        evaluated_props: &mut HashSet<&'i str>,
        errors: &mut Vec<ValidationError<'i>>,
    ) {
        let error_count = errors.len();
        let mut sub_evaluated_props = HashSet::new();
        let fail = |keyword: &'static str, message: &str| {
            ValidationError::new(instance, instance_path, keyword, message.to_owned())
        };

        match self {
            SchemaApplicator::OneOf(vec) => {
                if count_matches(vec, instance, instance_path, &mut sub_evaluated_props) != 1 {
                    errors.push(fail("oneOf", "must match exactly one schema in oneOf"));
                }
            }
            SchemaApplicator::AnyOf(vec) => {
                // Every branch is evaluated, so that sub_evaluated_props is complete.
                if count_matches(vec, instance, instance_path, &mut sub_evaluated_props) == 0 {
                    errors.push(fail("anyOf", "must match a schema in anyOf"));
                }
            }
            SchemaApplicator::AllOf(vec) => {
                for s in vec {
                    s.continue_validation(
                        instance,
                        instance_path,
                        &mut sub_evaluated_props,
                        errors,
                    );
                }
            }
            SchemaApplicator::IfThenElse(if_s, then_s, else_s) => {
                let (branch, name) = if if_s.continue_validation(
                    instance,
                    instance_path,
                    &mut sub_evaluated_props,
                    &mut vec![],
                ) {
                    (then_s, "then")
                } else {
                    (else_s, "else")
                };
                if let Some(s) = branch {
                    if !s.continue_validation(
                        instance,
                        instance_path,
                        &mut sub_evaluated_props,
                        errors,
                    ) {
                        errors.push(fail("if", &format!("must match \"{name}\" schema")));
                    }
                }
            }
            SchemaApplicator::Not(s) => {
                if s.continue_validation(instance, instance_path, &mut HashSet::new(), &mut vec![])
                {
                    errors.push(fail("not", "must NOT be valid"));
                }
            }
            SchemaApplicator::Properties(props) => {
                if let Some(m) = instance.as_object() {
                    for (prop_name, prop_schema) in props {
                        if let Some((prop_key, prop_instance)) = m.get_key_value(*prop_name) {
                            validated_props.insert(prop_key);
                            let path = push_pointer(instance_path, prop_key);
                            if prop_schema.validate_at(prop_instance, &path, errors) {
                                sub_evaluated_props.insert(prop_key);
                            }
                        }
                    }
                }
            }
            SchemaApplicator::AdditionalProperties(s) => {
                if let Some(m) = instance.as_object() {
                    for (prop_name, prop_value) in m {
                        if validated_props.contains(prop_name.as_str()) {
                            continue;
                        }
                        if validate_leftover(s, prop_name, prop_value, instance_path, errors) {
                            sub_evaluated_props.insert(prop_name);
                        } else if matches!(s, Subschema::Bool(false)) {
                            errors.push(fail(
                                "additionalProperties",
                                "must NOT have additional properties",
                            ));
                        }
                    }
                }
            }
            SchemaApplicator::Items(s) => {
                if let Some(a) = instance.as_array() {
                    for (i, item) in a.iter().enumerate() {
                        s.validate_at(item, &push_pointer(instance_path, &i.to_string()), errors);
                    }
                }
            }
            SchemaApplicator::UnevaluatedProperties(s) => {
                // This keyword is always put last on the list, so we can assume that other
                // applicators have already contributed to `evaluated_props`
                if let Some(m) = instance.as_object() {
                    for (prop_name, prop_value) in m {
                        if evaluated_props.contains(prop_name.as_str()) {
                            continue;
                        }
                        if validate_leftover(s, prop_name, prop_value, instance_path, errors) {
                            sub_evaluated_props.insert(prop_name);
                        } else if matches!(s, Subschema::Bool(false)) {
                            errors.push(fail(
                                "unevaluatedProperties",
                                "must NOT have unevaluated properties",
                            ));
                        }
                    }
                }
            }
        }

        if errors.len() == error_count {
            evaluated_props.extend(sub_evaluated_props);
        }
    }
}

/// Validates each branch in isolation and returns how many of them matched.
/// Branch errors are discarded, only the count is reported.
fn count_matches<'i>(
    branches: &[Subschema],
    instance: &'i Value,
    instance_path: &str,
    evaluated_props: &mut HashSet<&'i str>,
) -> usize {
    branches
        .iter()
        .filter(|s| s.continue_validation(instance, instance_path, evaluated_props, &mut vec![]))
        .count()
}

/// Validates a property left over by `properties` (or by every other keyword).
/// A `false` subschema is reported once by the caller, at the object level,
/// instead of as a nested boolean schema failure.
fn validate_leftover<'i>(
    s: &Subschema,
    prop_name: &'i str,
    prop_value: &'i Value,
    instance_path: &str,
    errors: &mut Vec<ValidationError<'i>>,
) -> bool {
    match s {
        Subschema::Bool(b) => *b,
        _ => s.validate_at(prop_value, &push_pointer(instance_path, prop_name), errors),
    }
}
