// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generators for globally unique stage identifiers.

use uuid::Uuid;

/// Produces the identifier given to a stage that was not supplied one.
///
/// Identifiers are plain strings once assigned; the generator only decides
/// how the text is produced.
pub trait StageIdGenerator {
    /// Returns a fresh identifier for a stage.
    ///
    /// ## Arguments
    /// * `display_name` - The label of the stage being created. Generators may
    ///   ignore it.
    fn generate(&self, display_name: &str) -> String;
}

/// Random (version 4) UUID identifiers. This is the default generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidStageIdGenerator;

impl StageIdGenerator for UuidStageIdGenerator {
    fn generate(&self, _display_name: &str) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic (version 5) UUID identifiers derived from a namespace and
/// the display name.
///
/// Useful for fixtures and reproducible builds: the same namespace and name
/// always yield the same identifier.
#[derive(Debug, Clone, Copy)]
pub struct NamespacedStageIdGenerator {
    namespace: Uuid,
}

impl NamespacedStageIdGenerator {
    /// Creates a generator scoped to `namespace`.
    ///
    /// ## Arguments
    /// * `namespace` - The UUID namespace hashed together with each display name.
    pub fn new(namespace: Uuid) -> Self {
        Self { namespace }
    }
}

impl Default for NamespacedStageIdGenerator {
    fn default() -> Self {
        Self::new(Uuid::NAMESPACE_OID)
    }
}

impl StageIdGenerator for NamespacedStageIdGenerator {
    fn generate(&self, display_name: &str) -> String {
        Uuid::new_v5(&self.namespace, display_name.as_bytes()).to_string()
    }
}
