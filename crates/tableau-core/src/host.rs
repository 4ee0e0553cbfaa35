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

//! Contracts between the stage model and the live scene that hosts it.
//!
//! The host (a 3D scene graph, an editor, a test double) owns the actual
//! objects. The stage only ever sees:
//! - opaque [`SceneObjectHandle`]s and [`Capability`] handles,
//! - the [`SceneHost`] trait, used to turn a handle into a stable identity
//!   and to enumerate the components attached to it.

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque reference to a live object owned by the host scene.
///
/// The value `0` is reserved as the null handle. Handles are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneObjectHandle(u64);

impl SceneObjectHandle {
    /// The null handle. Never refers to a live object.
    pub const NULL: Self = Self(0);

    /// Wraps a raw host value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw host value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` for the null handle.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Default for SceneObjectHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// A shared, type-erased handle to a live capability exposed by a scene object.
///
/// Cloning is cheap and yields a handle to the same capability; two handles
/// compare equal only when they point at the same allocation.
#[derive(Clone)]
pub struct Capability(Arc<dyn Any + Send + Sync>);

impl Capability {
    /// Wraps a live capability object.
    pub fn new<T: Any + Send + Sync>(capability: T) -> Self {
        Self(Arc::new(capability))
    }

    /// Wraps an already shared capability object.
    pub fn from_arc(capability: Arc<dyn Any + Send + Sync>) -> Self {
        Self(capability)
    }

    /// Returns the capability as `T` if that is its concrete type.
    ///
    /// ## Returns
    /// `None` when the capability holds some other type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if the capability's concrete type is `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Capability {}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}

/// The stable identity the host reports for a live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentity {
    /// Identity that survives save/load cycles (a path, a GUID, ...).
    pub stable_id: String,
    /// Human-readable object name, used as the prop name.
    pub name: String,
}

/// One component the host found on a live object.
#[derive(Debug, Clone)]
pub struct ComponentBinding {
    /// Logical type of the component.
    pub type_identifier: String,
    /// The component's own data, opaque to the stage.
    pub serialized_fields: Value,
    /// Stable identity used to re-resolve the capability on load.
    pub reference: Option<String>,
    /// The live capability, if the host exposes one.
    pub capability: Option<Capability>,
}

impl ComponentBinding {
    /// A binding that only carries data, with no live capability.
    pub fn data(type_identifier: impl Into<String>, serialized_fields: Value) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            serialized_fields,
            reference: None,
            capability: None,
        }
    }

    /// Attaches a live capability and the reference it can be resolved from.
    ///
    /// ## Arguments
    /// * `reference` - Stable identity persisted alongside the component.
    /// * `capability` - The live object bound at capture time.
    pub fn with_capability(mut self, reference: impl Into<String>, capability: Capability) -> Self {
        self.reference = Some(reference.into());
        self.capability = Some(capability);
        self
    }
}

/// The host side of a stage: the live scene that props are captured from.
///
/// Implementations live outside this workspace (engine glue, editor glue) or
/// in tests as in-memory doubles.
pub trait SceneHost {
    /// Resolves a handle to its stable identity.
    ///
    /// ## Arguments
    /// * `handle` - The live scene object to look up.
    ///
    /// ## Returns
    /// The object's identity, or `None` if the handle does not refer to a live
    /// object.
    fn resolve(&self, handle: SceneObjectHandle) -> Option<ObjectIdentity>;

    /// Lists the components attached to the object behind `handle`.
    ///
    /// ## Returns
    /// One binding per component, in the host's order. Empty for unknown handles.
    fn enumerate_components(&self, handle: SceneObjectHandle) -> Vec<ComponentBinding>;
}
