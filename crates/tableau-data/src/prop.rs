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

//! Nodes of the stage graph.

use crate::component::Component;
use std::hash::{Hash, Hasher};
use tableau_core::host::SceneObjectHandle;

/// The `parent_id` of a prop that has no parent.
pub const ROOT_PARENT_ID: i32 = -1;

/// A node of a [`Stage`](crate::Stage).
///
/// Props are passive: every structural change to a stage goes through the
/// stage's `add_*` family. The id is fixed at construction so that the
/// stage's index stays valid while a prop is borrowed mutably.
///
/// The parent is stored as an id. Nothing checks that it resolves or that the
/// chain is acyclic; see [`Stage::diagnose_hierarchy`](crate::Stage::diagnose_hierarchy).
#[derive(Debug, Clone)]
pub struct Prop {
    id: i32,
    parent_id: i32,
    name: String,
    components: Vec<Component>,
    object_ref: Option<String>,
    bound_object: Option<SceneObjectHandle>,
}

impl Prop {
    /// Creates an unbound prop with no components.
    pub fn new(id: i32, parent_id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            components: Vec::new(),
            object_ref: None,
            bound_object: None,
        }
    }

    /// Sets the persisted reference of the scene object this prop mirrors.
    pub fn with_object_ref(mut self, object_ref: impl Into<String>) -> Self {
        self.object_ref = Some(object_ref.into());
        self
    }

    /// Appends a component, builder style.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// The prop's id, unique within its stage by convention.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The parent's id, or [`ROOT_PARENT_ID`].
    pub fn parent_id(&self) -> i32 {
        self.parent_id
    }

    /// Returns `true` if the prop claims no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    /// The prop's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the prop.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The component at `index`, in attachment order.
    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Mutable access to the component at `index`.
    pub fn component_mut(&mut self, index: usize) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    /// All components, in attachment order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Attaches a component after the existing ones.
    pub fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// The persisted reference of the mirrored scene object, if any.
    pub fn object_ref(&self) -> Option<&str> {
        self.object_ref.as_deref()
    }

    /// The live scene object this prop is bound to, if any.
    pub fn bound_object(&self) -> Option<SceneObjectHandle> {
        self.bound_object
    }

    /// Binds the prop to a live scene object.
    pub fn bind_object(&mut self, handle: SceneObjectHandle) {
        self.bound_object = Some(handle);
    }
}

impl PartialEq for Prop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.parent_id == other.parent_id
            && self.name == other.name
            && self.components == other.components
            && self.object_ref == other.object_ref
    }
}

impl Hash for Prop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.parent_id.hash(state);
        self.name.hash(state);
        self.components.hash(state);
        self.object_ref.hash(state);
    }
}
