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

//! Typed payloads attached to props.

use crate::hash::hash_payload;
use serde_json::Value;
use std::hash::{Hash, Hasher};
use tableau_core::host::{Capability, ComponentBinding};

/// A typed payload attached to a [`Prop`](crate::Prop).
///
/// The payload is opaque to the stage. A component may also hold a live
/// [`Capability`] on the host object; that handle is never persisted and does
/// not take part in equality or hashing. Only its `reference` is persisted.
#[derive(Debug, Clone)]
pub struct Component {
    type_identifier: String,
    serialized_fields: Value,
    reference: Option<String>,
    bound_capability: Option<Capability>,
}

impl Component {
    /// Creates an unbound component.
    pub fn new(type_identifier: impl Into<String>, serialized_fields: Value) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            serialized_fields,
            reference: None,
            bound_capability: None,
        }
    }

    /// Sets the stable reference the capability is resolved from on load.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// The logical type this component represents.
    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    /// The component's own data.
    pub fn serialized_fields(&self) -> &Value {
        &self.serialized_fields
    }

    /// Mutable access to the component's data.
    pub fn serialized_fields_mut(&mut self) -> &mut Value {
        &mut self.serialized_fields
    }

    /// The persisted reference of the live capability, if any.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The live capability, if the component is bound.
    pub fn bound_capability(&self) -> Option<&Capability> {
        self.bound_capability.as_ref()
    }

    /// Binds the component to a live capability.
    pub fn bind(&mut self, capability: Capability) {
        self.bound_capability = Some(capability);
    }

    /// Returns `true` if the bound capability is a `T`.
    pub fn has_capability<T: std::any::Any>(&self) -> bool {
        self.bound_capability.as_ref().is_some_and(|c| c.is::<T>())
    }
}

impl From<ComponentBinding> for Component {
    fn from(binding: ComponentBinding) -> Self {
        Self {
            type_identifier: binding.type_identifier,
            serialized_fields: binding.serialized_fields,
            reference: binding.reference,
            bound_capability: binding.capability,
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.type_identifier == other.type_identifier
            && self.serialized_fields == other.serialized_fields
            && self.reference == other.reference
    }
}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_identifier.hash(state);
        hash_payload(&self.serialized_fields, state);
        self.reference.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::content_hash_of;
    use serde_json::json;

    struct Emitter;

    #[test]
    fn binding_is_ignored_by_equality_and_hash() {
        let plain = Component::new("Emitter", json!({"rate": 4})).with_reference("fx/smoke");
        let mut bound = plain.clone();
        bound.bind(Capability::new(Emitter));

        assert_eq!(plain, bound);
        assert_eq!(content_hash_of(&plain), content_hash_of(&bound));
        assert!(bound.has_capability::<Emitter>());
        assert!(!plain.has_capability::<Emitter>());
    }

    #[test]
    fn payload_changes_hash() {
        let a = Component::new("Transform", json!({"x": 0}));
        let b = Component::new("Transform", json!({"x": 1}));
        assert_ne!(a, b);
        assert_ne!(content_hash_of(&a), content_hash_of(&b));
    }

    #[test]
    fn payload_key_order_is_ignored() {
        let ab = Component::new("T", json!({"a": 1, "b": 2}));
        let ba = Component::new("T", json!({"b": 2, "a": 1}));
        assert_eq!(ab, ba);
        assert_eq!(content_hash_of(&ab), content_hash_of(&ba));
    }

    #[test]
    fn from_binding_keeps_live_capability() {
        let binding = ComponentBinding::data("Emitter", json!(null))
            .with_capability("fx/smoke", Capability::new(Emitter));
        let component = Component::from(binding);
        assert_eq!(component.type_identifier(), "Emitter");
        assert_eq!(component.reference(), Some("fx/smoke"));
        assert!(component.bound_capability().is_some());
    }
}
