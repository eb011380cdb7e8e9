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

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::SchemaError::{self, UnresolvableRef};
use super::Subschema;
use serde_json::Value;

/// A resolved `$ref` target. Shared between every keyword pointing at it, and
/// only filled in once the target has been compiled, which lets refs form
/// cycles.
pub type RefTarget<'a> = Arc<OnceLock<Subschema<'a>>>;

/// Resolves local `$ref` pointers while a schema is being compiled. Only lives
/// for the duration of [super::Schema::from_json].
pub struct RefResolver<'a> {
    root_value: &'a Value,
    cache: RefCell<HashMap<String, RefTarget<'a>>>,
}

impl<'a> RefResolver<'a> {
    pub fn new(root_value: &'a Value) -> Self {
        Self { root_value, cache: RefCell::new(HashMap::new()) }
    }

    /// Resolves a [super::subschema::SchemaKeyword::Ref] pointer. The result is cached and
    /// reused in subsequent calls.
    pub fn resolve<'p>(&self, pointer: &'p str) -> Result<RefTarget<'a>, SchemaError<'p>>
    where
        'a: 'p,
    {
        if let Some(result) = self.cache.borrow().get(pointer) {
            // The value can still be unset at this point, which means we're within a
            // recursive ref resolution. When we get out of those recursions, the actual
            // Subschemas will be present.
            return Ok(Arc::clone(result));
        }

        // Value::pointer expects the pointer to start with '/', so the leading '#' is
        // removed first.
        let resolved_value = pointer
            .strip_prefix('#')
            .and_then(|p| self.root_value.pointer(p))
            .ok_or(UnresolvableRef(pointer))?;

        // Insert a pending entry first, to break potential Ref cycles.
        let entry = Arc::new(OnceLock::new());
        self.cache.borrow_mut().insert(pointer.to_owned(), Arc::clone(&entry));

        let subschema = Subschema::from_json(resolved_value, self)?;
        assert!(entry.set(subschema).is_ok(), "Expected the entry to be unset.");
        Ok(entry)
    }
}
