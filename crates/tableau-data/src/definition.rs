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

//! Defines the stable, persisted representation of a stage.
//!
//! These types mirror the live model field for field, minus every live
//! handle. They are what the conversion engine reads and writes.

use crate::component::Component;
use crate::prop::Prop;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The root of a persisted stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StageDefinition {
    /// Schema version the stage was written under.
    pub version: u16,
    /// The stage's unique identifier.
    pub id: String,
    /// The stage's human label.
    pub display_name: String,
    /// Props in stage order.
    pub props: Vec<PropDefinition>,
}

/// A persisted prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropDefinition {
    /// The prop's id.
    pub id: i32,
    /// The parent's id, `-1` for roots.
    pub parent_id: i32,
    /// The prop's name.
    pub name: String,
    /// Stable reference of the mirrored scene object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,
    /// Components in attachment order.
    pub components: Vec<ComponentDefinition>,
}

/// A persisted component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentDefinition {
    /// The component's logical type.
    pub type_identifier: String,
    /// The component's opaque data.
    pub serialized_fields: Value,
    /// Stable reference of the live capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl From<&Component> for ComponentDefinition {
    fn from(component: &Component) -> Self {
        Self {
            type_identifier: component.type_identifier().to_string(),
            serialized_fields: component.serialized_fields().clone(),
            reference: component.reference().map(str::to_string),
        }
    }
}

impl From<ComponentDefinition> for Component {
    fn from(definition: ComponentDefinition) -> Self {
        let component = Component::new(definition.type_identifier, definition.serialized_fields);
        match definition.reference {
            Some(reference) => component.with_reference(reference),
            None => component,
        }
    }
}

impl From<&Prop> for PropDefinition {
    fn from(prop: &Prop) -> Self {
        Self {
            id: prop.id(),
            parent_id: prop.parent_id(),
            name: prop.name().to_string(),
            object_ref: prop.object_ref().map(str::to_string),
            components: prop.components().iter().map(Into::into).collect(),
        }
    }
}

impl From<PropDefinition> for Prop {
    fn from(definition: PropDefinition) -> Self {
        let mut prop = Prop::new(definition.id, definition.parent_id, definition.name);
        if let Some(object_ref) = definition.object_ref {
            prop = prop.with_object_ref(object_ref);
        }
        for component in definition.components {
            prop.push_component(component.into());
        }
        prop
    }
}

impl From<&Stage> for StageDefinition {
    fn from(stage: &Stage) -> Self {
        Self {
            version: stage.version(),
            id: stage.id().to_string(),
            display_name: stage.display_name().to_string(),
            props: stage.props().iter().map(Into::into).collect(),
        }
    }
}

impl StageDefinition {
    /// Iterates over every persisted reference, props before their components.
    ///
    /// Yields `(prop_index, component_index, reference)`; `component_index` is
    /// `None` for a prop's own `object_ref`.
    pub fn references(&self) -> impl Iterator<Item = (usize, Option<usize>, &str)> {
        self.props
            .iter()
            .enumerate()
            .flat_map(|(prop_index, prop)| {
                let own = prop
                    .object_ref
                    .as_deref()
                    .map(|reference| (prop_index, None, reference));
                let components = prop
                    .components
                    .iter()
                    .enumerate()
                    .filter_map(move |(component_index, component)| {
                        component
                            .reference
                            .as_deref()
                            .map(|reference| (prop_index, Some(component_index), reference))
                    });
                own.into_iter().chain(components)
            })
    }
}
