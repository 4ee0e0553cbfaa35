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

//! The stage: an owned, ordered arena of props with identity and lookups.

use crate::event::StageEvent;
use crate::hash::content_hasher;
use crate::index::PropIndex;
use crate::prop::Prop;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use tableau_core::host::{SceneHost, SceneObjectHandle};
use tableau_core::id::{StageIdGenerator, UuidStageIdGenerator};

/// The schema version new stages are authored under.
pub const CURRENT_VERSION: u16 = 2;

/// A versioned, named, identity-bearing ordered collection of [`Prop`]s.
///
/// Insertion order is significant: it is the order props are serialized and
/// hashed in. Lookups by id go through a lazily built index; lookups by name,
/// bound object or capability scan from the most recently added prop, so the
/// latest match wins.
///
/// A stage is not `Sync`; mutate it from one thread at a time.
///
/// # Equality
///
/// Two stages are equal when their [`content_hash`](Stage::content_hash)
/// values are equal. Live handles never take part.
pub struct Stage {
    version: u16,
    id: String,
    display_name: String,
    props: Vec<Prop>,
    index: PropIndex,
    observer: Option<flume::Sender<StageEvent>>,
}

impl Stage {
    /// Creates an empty stage with a freshly generated UUID identifier.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self::with_generator(&UuidStageIdGenerator, display_name)
    }

    /// Creates an empty stage whose identifier comes from `generator`.
    pub fn with_generator(
        generator: &dyn StageIdGenerator,
        display_name: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        let id = generator.generate(&display_name);
        Self::with_id(id, display_name)
    }

    /// Creates an empty stage with an explicit identifier.
    pub fn with_id(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::from_parts(CURRENT_VERSION, id, display_name, Vec::new())
    }

    /// Assembles a stage from already built props.
    ///
    /// Used by decoders; `version` is taken as given.
    pub fn from_parts(
        version: u16,
        id: impl Into<String>,
        display_name: impl Into<String>,
        props: Vec<Prop>,
    ) -> Self {
        Self {
            version,
            id: id.into(),
            display_name: display_name.into(),
            props,
            index: PropIndex::default(),
            observer: None,
        }
    }

    /// The schema version this stage was authored under.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// The stage's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The stage's human label.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Read-only view of the props in stage order.
    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Iterates over the props in stage order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prop> {
        self.props.iter()
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns `true` if the stage holds no props.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    // --- Observer ---

    /// Routes [`StageEvent`]s for this stage to `sender`, replacing any
    /// previously attached observer.
    pub fn attach_observer(&mut self, sender: flume::Sender<StageEvent>) {
        self.observer = Some(sender);
    }

    /// Stops notifying the attached observer, returning it.
    pub fn detach_observer(&mut self) -> Option<flume::Sender<StageEvent>> {
        self.observer.take()
    }

    // --- Mutation ---

    /// Appends a bare prop whose id is the current prop count.
    pub fn add_prop(&mut self, parent_id: i32) -> &mut Prop {
        let id = self.next_default_id();
        self.push(Prop::new(id, parent_id, String::new()))
    }

    /// Appends a bare prop with a caller-chosen id.
    ///
    /// Uniqueness is the caller's responsibility. If the id is already taken,
    /// id lookups resolve to this newer prop from now on.
    pub fn add_prop_with_id(&mut self, id: i32, parent_id: i32) -> &mut Prop {
        self.push(Prop::new(id, parent_id, String::new()))
    }

    /// Appends a prop mirroring a live scene object.
    ///
    /// The prop takes the object's name, its stable identity as `object_ref`,
    /// and one component per binding the host enumerates. Returns `None`
    /// without touching the stage if `handle` is null or the host does not
    /// recognise it.
    pub fn add_bound_prop(
        &mut self,
        host: &dyn SceneHost,
        handle: SceneObjectHandle,
        parent_id: i32,
    ) -> Option<&mut Prop> {
        if handle.is_null() {
            log::debug!("Ignoring null scene object handle for stage '{}'.", self.id);
            return None;
        }
        let Some(identity) = host.resolve(handle) else {
            log::debug!(
                "Scene object {handle:?} is unknown to the host; no prop added to stage '{}'.",
                self.id
            );
            return None;
        };

        let id = self.next_default_id();
        let mut prop = Prop::new(id, parent_id, identity.name).with_object_ref(identity.stable_id);
        prop.bind_object(handle);
        for binding in host.enumerate_components(handle) {
            prop.push_component(binding.into());
        }
        Some(self.push(prop))
    }

    /// Appends a fully built prop as is.
    pub fn insert_prop(&mut self, prop: Prop) -> &mut Prop {
        self.push(prop)
    }

    /// Removes and returns the prop currently indexed under `id`.
    ///
    /// Default ids come from the prop count, so a later [`add_prop`](Self::add_prop)
    /// can reuse an id that is still live. With ids `0, 1, 2`, removing `0`
    /// and adding again yields a second prop `2`, which then wins id lookups.
    /// Use [`add_prop_with_id`](Self::add_prop_with_id) to avoid that.
    pub fn remove_prop(&mut self, id: i32) -> Option<Prop> {
        let position = self.position_of(id)?;
        let removed = self.props.remove(position);
        self.index.invalidate();
        Some(removed)
    }

    /// Swaps the props at positions `a` and `b`.
    ///
    /// Returns `false` and leaves the stage untouched if either position is
    /// out of range.
    pub fn swap_props(&mut self, a: usize, b: usize) -> bool {
        if a >= self.props.len() || b >= self.props.len() {
            return false;
        }
        self.props.swap(a, b);
        self.index.invalidate();
        true
    }

    fn next_default_id(&self) -> i32 {
        i32::try_from(self.props.len()).unwrap_or(i32::MAX)
    }

    fn push(&mut self, prop: Prop) -> &mut Prop {
        let position = self.props.len();
        self.index.record(prop.id(), position);
        if let Some(observer) = &self.observer {
            let event = StageEvent::PropAdded {
                stage_id: self.id.clone(),
                prop: prop.clone(),
            };
            if let Err(e) = observer.send(event) {
                log::error!("Failed to notify stage observer: {e}. Receiver likely disconnected.");
            }
        }
        self.props.push(prop);
        &mut self.props[position]
    }

    // --- Lookups ---

    /// Arena position of the prop indexed under `id`.
    pub(crate) fn position_of(&self, id: i32) -> Option<usize> {
        self.index.position(id, &self.props)
    }

    /// The prop indexed under `id`.
    pub fn prop(&self, id: i32) -> Option<&Prop> {
        self.position_of(id).map(|position| &self.props[position])
    }

    /// Mutable access to the prop indexed under `id`.
    pub fn prop_mut(&mut self, id: i32) -> Option<&mut Prop> {
        let position = self.position_of(id)?;
        self.props.get_mut(position)
    }

    /// The most recently added prop bound to `handle`.
    pub fn prop_by_object(&self, handle: SceneObjectHandle) -> Option<&Prop> {
        if handle.is_null() {
            return None;
        }
        self.props
            .iter()
            .rev()
            .find(|prop| prop.bound_object() == Some(handle))
    }

    /// The most recently added prop named exactly `name`.
    pub fn prop_by_name(&self, name: &str) -> Option<&Prop> {
        self.props.iter().rev().find(|prop| prop.name() == name)
    }

    /// Every prop with at least one component whose live capability is a `T`,
    /// most recently added first.
    pub fn props_with_capability<T: Any>(&self) -> Vec<&Prop> {
        self.props
            .iter()
            .rev()
            .filter(|prop| prop.components().iter().any(|c| c.has_capability::<T>()))
            .collect()
    }

    /// Every prop with at least one component of `type_identifier`, most
    /// recently added first.
    pub fn props_with_component_type(&self, type_identifier: &str) -> Vec<&Prop> {
        self.props
            .iter()
            .rev()
            .filter(|prop| {
                prop.components()
                    .iter()
                    .any(|c| c.type_identifier() == type_identifier)
            })
            .collect()
    }

    /// Returns `true` if `text` is exactly the display name, or the id
    /// compared case-insensitively. Empty text never matches.
    pub fn is_match(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        text == self.display_name || text.to_lowercase() == self.id.to_lowercase()
    }

    // --- Identity ---

    /// Order-sensitive hash of the stage's persisted content.
    ///
    /// Covers version, id, display name and every prop in stage order. Live
    /// handles and the attached observer are ignored.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = content_hasher();
        self.version.hash(&mut hasher);
        self.id.hash(&mut hasher);
        self.display_name.hash(&mut hasher);
        self.props.hash(&mut hasher);
        hasher.finish()
    }
}

impl Clone for Stage {
    /// Deep-copies every prop and component. The copy has a fresh index and
    /// no observer.
    fn clone(&self) -> Self {
        Self::from_parts(
            self.version,
            self.id.clone(),
            self.display_name.clone(),
            self.props.clone(),
        )
    }
}

impl PartialEq for Stage {
    fn eq(&self, other: &Self) -> bool {
        self.content_hash() == other.content_hash()
    }
}

impl Eq for Stage {}

impl Hash for Stage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("version", &self.version)
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("props", &self.props)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Stage {
    type Item = &'a Prop;
    type IntoIter = std::slice::Iter<'a, Prop>;

    fn into_iter(self) -> Self::IntoIter {
        self.props.iter()
    }
}
