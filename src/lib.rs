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

//! Checks whether inputs are Lottie animations.
//!
//! Two levels of checking are offered:
//!
//! * [file] recognizes `.lottie` containers by their ZIP signature and Lottie
//!   JSON documents by the presence of their mandatory top level fields. This
//!   is a cheap heuristic meant for routing inputs.
//! * [validator] validates a JSON document against the full Lottie schema and
//!   reports every violation it finds.

pub mod file;
pub mod validator;

pub use file::{
    is_dot_lottie, is_lottie, is_lottie_json, try_validate_file, validate_file, FileData,
    FileError, LottieSource,
};
pub use validator::{validate_lottie_json, LottieValidator, ValidationResult};
