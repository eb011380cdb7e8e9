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

//! lottie-validate: checks whether files are Lottie animations.
//!
//! Exits with 0 when every file is valid, 2 when any file is invalid and 1
//! when a file can't be read.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lottie_validator::file::{is_dot_lottie, try_validate_file, FileError};
use lottie_validator::validator::validate_lottie_json;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lottie-validate")]
#[command(about = "Checks whether files are Lottie animations (.json or .lottie)")]
struct Cli {
    /// Also validate JSON files against the full Lottie schema
    #[arg(short, long)]
    schema: bool,

    /// Print one JSON object per file
    #[arg(long)]
    json: bool,

    /// Log dispatch decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Kind {
    DotLottie,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    file: String,
    kind: Kind,
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn check(file: String, data: &[u8], full_schema: bool) -> Report {
    if is_dot_lottie(data) {
        debug!("{file} is a .lottie container");
        return Report { file, kind: Kind::DotLottie, is_valid: true, error: None };
    }

    let invalid = |file, error: String| Report {
        file,
        kind: Kind::Json,
        is_valid: false,
        error: Some(error),
    };

    let Ok(text) = std::str::from_utf8(data) else {
        return invalid(file, "Not a .lottie container or UTF-8 text".to_string());
    };
    let json: Value = match serde_json::from_str(text) {
        Ok(json) => json,
        Err(e) => return invalid(file, FileError::from(e).to_string()),
    };

    match try_validate_file(&json) {
        Ok(true) => {}
        Ok(false) => return invalid(file, "Missing mandatory Lottie fields".to_string()),
        Err(e) => return invalid(file, e.to_string()),
    }

    if full_schema {
        let result = validate_lottie_json(&json);
        return Report { file, kind: Kind::Json, is_valid: result.is_valid, error: result.error };
    }
    Report { file, kind: Kind::Json, is_valid: true, error: None }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy(),
        )
        .try_init();

    let mut any_invalid = false;
    let mut io_failure = false;
    for path in &cli.files {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to read {}: {e}", path.display());
                io_failure = true;
                continue;
            }
        };

        let report = check(path.display().to_string(), &data, cli.schema);
        any_invalid |= !report.is_valid;

        if cli.json {
            match serde_json::to_string(&report) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Failed to serialize report for {}: {e}", report.file),
            }
        } else if report.is_valid {
            println!("{}: valid", report.file);
        } else {
            println!("{}: invalid: {}", report.file, report.error.unwrap_or_default());
        }
    }

    if io_failure {
        ExitCode::FAILURE
    } else if any_invalid {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MINIMAL: &str =
        r#"{"v":"5.7.4","fr":30,"ip":0,"op":60,"w":512,"h":512,"ddd":0,"assets":[],"layers":[]}"#;

    #[test]
    fn test_dot_lottie() {
        let report = check("a.lottie".into(), b"PK\x03\x04rest", true);
        assert!(report.is_valid);
        assert!(report.kind == Kind::DotLottie);
    }

    #[test]
    fn test_json() {
        assert!(check("a.json".into(), MINIMAL.as_bytes(), false).is_valid);
        assert!(check("a.json".into(), MINIMAL.as_bytes(), true).is_valid);
    }

    #[test]
    fn test_schema_errors_are_reported() {
        let doc = MINIMAL.replace(r#""fr":30"#, r#""fr":"30""#);
        assert!(check("a.json".into(), doc.as_bytes(), false).is_valid);

        let report = check("a.json".into(), doc.as_bytes(), true);
        assert!(!report.is_valid);
        assert_eq!(report.error.as_deref(), Some("data/fr must be number"));
    }

    #[test]
    fn test_not_lottie() {
        let report = check("a.bin".into(), &[0xFF, 0xFE, 0x00], false);
        assert!(!report.is_valid);
        assert!(report.kind == Kind::Json);

        let report = check("a.json".into(), b"{\"v\": \"5.7.4\"}", false);
        assert_eq!(report.error.as_deref(), Some("Missing mandatory Lottie fields"));

        let report = check("a.json".into(), b"42", false);
        assert!(report.error.unwrap().starts_with("Invalid input type"));
    }

    #[test]
    fn test_report_serialization() {
        let report = check("a.lottie".into(), b"PK\x03\x04", false);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"file": "a.lottie", "kind": "dotlottie", "isValid": true})
        );
    }
}
