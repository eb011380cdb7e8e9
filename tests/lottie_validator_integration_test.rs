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

//! Lottie Validator integration tests.
#![cfg(test)]

mod suite;
use std::{fs::File, io::BufReader};

use lottie_validator::file::{is_lottie, validate_file, ZIP_SIGNATURE};
use lottie_validator::validator::{validate_lottie_json, LottieValidator, BUNDLED_SCHEMA};
use serde_json::Value;
use spec::expect_failure;
use spec::expect_success;
use suite::test_suite;

test_suite!(type);
test_suite!(enum);
test_suite!(const);
test_suite!(pattern);
test_suite!(format);
test_suite!(minimum);
test_suite!(exclusiveMinimum);
test_suite!(maximum);
test_suite!(exclusiveMaximum);
test_suite!(multipleOf);
test_suite!(minLength);
test_suite!(maxLength);
test_suite!(maxItems);
test_suite!(minItems);
test_suite!(uniqueItems);
test_suite!(required);
test_suite!(anyOf);
test_suite!(oneOf);
test_suite!(allOf);
test_suite!(not);
test_suite!(if_then_else);
test_suite!(items);
test_suite!(properties);
test_suite!(additionalProperties);
test_suite!(ref);
test_suite!(infinite_loop_detection);
test_suite!(unevaluatedProperties);

#[test]
fn test_bundled_schema() {
    let validator = LottieValidator::bundled();
    expect_success!(validator, "tests/spec/valid");
    expect_failure!(validator, "tests/spec/invalid");
}

#[test]
fn test_schema_file_matches_bundled_schema() {
    let schema_json: Value = serde_json::from_reader(BufReader::new(
        File::open("data/lottie.schema.json").unwrap(),
    ))
    .unwrap();
    assert_eq!(schema_json, serde_json::from_str::<Value>(BUNDLED_SCHEMA).unwrap());

    let validator = LottieValidator::new(&schema_json).unwrap();
    expect_success!(&validator, "tests/spec/valid");
    expect_failure!(&validator, "tests/spec/invalid");
}

#[test]
fn test_invalid_fixture_messages() {
    let errors: Vec<(String, String)> =
        spec::validate_dir(LottieValidator::bundled(), "tests/spec/invalid", &[])
            .filter_map(|(f, result)| result.err().map(|e| (f, e)))
            .collect();
    let error_for = |name: &str| {
        errors.iter().find(|(f, _)| f == name).map(|(_, e)| e.as_str()).unwrap_or_default()
    };

    assert_eq!(
        error_for("missing_dimensions.json"),
        "data must have required property 'w', data must have required property 'h'"
    );
    assert_eq!(error_for("string_framerate.json"), "data/fr must be number");
    assert_eq!(error_for("zero_framerate.json"), "data/fr must be > 0");
    assert_eq!(error_for("fractional_width.json"), "data/w must be integer");
    assert!(error_for("bad_version.json").starts_with("data/v must match pattern"));
    assert!(error_for("three_dimensional_flag.json")
        .contains("data/ddd must be equal to one of the allowed values"));
    assert!(error_for("precomp_without_ref.json")
        .contains("data/layers/0 must have required property 'refId'"));
    assert!(error_for("bad_solid_color.json")
        .contains("data/layers/0/sc must match format \"color\""));
    assert!(error_for("shape_without_type.json")
        .contains("data/layers/0/shapes/0 must have required property 'ty'"));
    assert!(error_for("ambiguous_position.json")
        .contains("data/layers/0/ks/p must match exactly one schema in oneOf"));
    assert!(error_for("asset_without_id.json")
        .contains("data/assets/0 must have required property 'id'"));
    assert_eq!(error_for("layers_not_array.json"), "data/layers must be array");
}

#[test]
fn test_file_dispatch_on_fixtures() {
    for (name, lottie_json) in spec::json_files("tests/spec/valid", &[]) {
        let text = std::fs::read_to_string(format!("tests/spec/valid/{name}")).unwrap();
        assert!(!validate_file(text.as_bytes()), "{name}");
        assert!(validate_file(text.as_str()), "{name}");
        assert!(validate_file(&lottie_json), "{name}");
        assert!(is_lottie(text.as_str()), "{name}");
    }
}

#[test]
fn test_dot_lottie_container() {
    let mut container = ZIP_SIGNATURE.to_vec();
    container.extend_from_slice(b"\x14\x00\x00\x00\x08\x00manifest.json");
    assert!(validate_file(&container));
}

#[test]
fn test_heuristic_is_weaker_than_schema() {
    // The mandatory field check only looks at keys, the schema at values too.
    let text = std::fs::read_to_string("tests/spec/invalid/string_framerate.json").unwrap();
    let lottie_json: Value = serde_json::from_str(&text).unwrap();
    assert!(validate_file(text.as_str()));
    assert!(!validate_lottie_json(&lottie_json).is_valid);

    // And the schema doesn't require `v`, which the field check does.
    let mut lottie_json: Value =
        serde_json::from_str(&std::fs::read_to_string("tests/spec/valid/minimal.json").unwrap())
            .unwrap();
    lottie_json.as_object_mut().unwrap().remove("v");
    assert!(!validate_file(&lottie_json));
    assert!(validate_lottie_json(&lottie_json).is_valid);
}

#[test]
fn test_bundled_validator_is_shared_across_threads() {
    let (_, lottie_json) = spec::json_files("tests/spec/valid", &[])
        .find(|(name, _)| name == "shape_layer.json")
        .unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..4).map(|_| s.spawn(|| validate_lottie_json(&lottie_json).is_valid)).collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}
