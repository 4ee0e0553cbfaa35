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

// Tableau Sandbox
// Captures a small scene into a stage, saves it and loads it back.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tableau_core::host::{
    Capability, ComponentBinding, ObjectIdentity, SceneHost, SceneObjectHandle,
};
use tableau_core::resolve::{Binding, ReferenceRequest, ReferenceResolver, ResolveError};
use tableau_core::EventBus;
use tableau_data::{Stage, StageEvent, ROOT_PARENT_ID};
use tableau_io::{ConversionSettings, StageConverter};

/// A capability the demo scene exposes on its light components.
#[derive(Debug)]
struct PointLight {
    intensity: f32,
}

struct SceneObject {
    identity: ObjectIdentity,
    components: Vec<ComponentBinding>,
}

/// A tiny in-memory scene standing in for an engine.
#[derive(Default)]
struct DemoScene {
    objects: HashMap<u64, SceneObject>,
    next_handle: u64,
}

impl DemoScene {
    fn spawn(&mut self, path: &str, components: Vec<ComponentBinding>) -> SceneObjectHandle {
        self.next_handle += 1;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        self.objects.insert(
            self.next_handle,
            SceneObject {
                identity: ObjectIdentity {
                    stable_id: path.to_string(),
                    name,
                },
                components,
            },
        );
        SceneObjectHandle::from_raw(self.next_handle)
    }

    fn find_object(&self, stable_id: &str) -> Option<SceneObjectHandle> {
        self.objects
            .iter()
            .find(|(_, object)| object.identity.stable_id == stable_id)
            .map(|(raw, _)| SceneObjectHandle::from_raw(*raw))
    }

    fn find_capability(&self, reference: &str) -> Option<Capability> {
        self.objects
            .values()
            .flat_map(|object| object.components.iter())
            .find(|binding| binding.reference.as_deref() == Some(reference))
            .and_then(|binding| binding.capability.clone())
    }
}

impl SceneHost for DemoScene {
    fn resolve(&self, handle: SceneObjectHandle) -> Option<ObjectIdentity> {
        self.objects
            .get(&handle.raw())
            .map(|object| object.identity.clone())
    }

    fn enumerate_components(&self, handle: SceneObjectHandle) -> Vec<ComponentBinding> {
        self.objects
            .get(&handle.raw())
            .map(|object| object.components.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReferenceResolver for DemoScene {
    async fn resolve(&self, requests: &[ReferenceRequest]) -> Result<Vec<Binding>, ResolveError> {
        let mut bindings = Vec::with_capacity(requests.len());
        for request in requests {
            let binding = match request {
                ReferenceRequest::Object { reference, .. } => {
                    self.find_object(reference).map(Binding::Object)
                }
                ReferenceRequest::Capability { reference, .. } => {
                    self.find_capability(reference).map(Binding::Capability)
                }
            };
            bindings.push(binding.ok_or_else(|| ResolveError::Unresolved {
                reference: request.reference().to_string(),
            })?);
        }
        Ok(bindings)
    }
}

fn build_scene() -> (DemoScene, Vec<SceneObjectHandle>) {
    let mut scene = DemoScene::default();
    let world = scene.spawn(
        "level/World",
        vec![ComponentBinding::data("Transform", json!({"position": [0, 0, 0]}))],
    );
    let lamp = scene.spawn(
        "level/World/Lamp",
        vec![
            ComponentBinding::data("Transform", json!({"position": [2, 4, 0]})),
            ComponentBinding::data("PointLight", json!({"intensity": 3.5})).with_capability(
                "level/World/Lamp#light",
                Capability::new(PointLight { intensity: 3.5 }),
            ),
        ],
    );
    (scene, vec![world, lamp])
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let (scene, handles) = build_scene();
    let scene = Arc::new(scene);

    let bus = EventBus::<StageEvent>::new();
    let mut stage = Stage::new("Demo Level");
    stage.attach_observer(bus.sender());
    stage.add_bound_prop(scene.as_ref(), handles[0], ROOT_PARENT_ID);
    stage.add_bound_prop(scene.as_ref(), handles[1], 0);
    stage.add_prop(0).set_name("Spawn Point");

    for event in bus.drain() {
        let StageEvent::PropAdded { stage_id, prop } = event;
        log::info!("Stage '{stage_id}' gained prop {} '{}'.", prop.id(), prop.name());
    }

    let report = stage.diagnose_hierarchy();
    if !report.is_clean() {
        log::warn!("Hierarchy issues found: {report:?}");
    }

    let converter = StageConverter::with_resolver(scene.clone()).with_settings(ConversionSettings {
        pretty_print: true,
        ..ConversionSettings::default()
    });
    let text = converter.encode_default(&stage)?;
    log::info!("Encoded stage '{}':\n{text}", stage.id());

    let loaded = converter.decode(&text).await?;
    log::info!(
        "Decoded {} props, content matches: {}.",
        loaded.len(),
        loaded == stage
    );

    for prop in loaded.props_with_capability::<PointLight>() {
        let intensity = prop
            .components()
            .iter()
            .filter_map(|c| c.bound_capability())
            .find_map(|c| c.downcast_ref::<PointLight>())
            .map(|light| light.intensity);
        log::info!("Prop '{}' is lit with intensity {intensity:?}.", prop.name());
    }

    Ok(())
}
