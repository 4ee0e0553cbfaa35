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

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tableau_core::host::{
    Capability, ComponentBinding, ObjectIdentity, SceneHost, SceneObjectHandle,
};
use tableau_core::resolve::{Binding, ReferenceRequest, ReferenceResolver, ResolveError};
use tableau_core::EventBus;
use tableau_data::{Stage, StageEvent, ROOT_PARENT_ID};
use tableau_io::{DecodeError, StageConverter};
use tempfile::tempdir;

// --- Test Setup: an in-memory scene acting as both host and resolver ---

#[derive(Debug)]
struct Lantern {
    lumens: u32,
}

struct LiveObject {
    identity: ObjectIdentity,
    bindings: Vec<ComponentBinding>,
}

#[derive(Default)]
struct MemoryScene {
    objects: HashMap<u64, LiveObject>,
    capabilities: HashMap<String, Capability>,
}

impl MemoryScene {
    fn spawn(&mut self, raw: u64, path: &str, bindings: Vec<ComponentBinding>) -> SceneObjectHandle {
        for binding in &bindings {
            if let (Some(reference), Some(capability)) = (&binding.reference, &binding.capability) {
                self.capabilities.insert(reference.clone(), capability.clone());
            }
        }
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        self.objects.insert(
            raw,
            LiveObject {
                identity: ObjectIdentity {
                    stable_id: path.to_string(),
                    name,
                },
                bindings,
            },
        );
        SceneObjectHandle::from_raw(raw)
    }

    fn handle_of(&self, path: &str) -> Option<SceneObjectHandle> {
        self.objects
            .iter()
            .find(|(_, object)| object.identity.stable_id == path)
            .map(|(raw, _)| SceneObjectHandle::from_raw(*raw))
    }
}

impl SceneHost for MemoryScene {
    fn resolve(&self, handle: SceneObjectHandle) -> Option<ObjectIdentity> {
        self.objects
            .get(&handle.raw())
            .map(|object| object.identity.clone())
    }

    fn enumerate_components(&self, handle: SceneObjectHandle) -> Vec<ComponentBinding> {
        self.objects
            .get(&handle.raw())
            .map(|object| object.bindings.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReferenceResolver for MemoryScene {
    async fn resolve(&self, requests: &[ReferenceRequest]) -> Result<Vec<Binding>, ResolveError> {
        requests
            .iter()
            .map(|request| {
                let missing = || ResolveError::Unresolved {
                    reference: request.reference().to_string(),
                };
                match request {
                    ReferenceRequest::Object { reference, .. } => {
                        self.handle_of(reference).map(Binding::Object).ok_or_else(missing)
                    }
                    ReferenceRequest::Capability { reference, .. } => self
                        .capabilities
                        .get(reference)
                        .cloned()
                        .map(Binding::Capability)
                        .ok_or_else(missing),
                }
            })
            .collect()
    }
}

fn castle_scene() -> (Arc<MemoryScene>, Vec<SceneObjectHandle>) {
    let mut scene = MemoryScene::default();
    let keep = scene.spawn(
        1,
        "castle/Keep",
        vec![ComponentBinding::data("Transform", json!({"x": 0, "y": 0}))],
    );
    let lantern = scene.spawn(
        2,
        "castle/Keep/Lantern",
        vec![
            ComponentBinding::data("Transform", json!({"x": 1, "y": 3})),
            ComponentBinding::data("Light", json!({"lumens": 450}))
                .with_capability("lights/lantern", Capability::new(Lantern { lumens: 450 })),
        ],
    );
    (Arc::new(scene), vec![keep, lantern])
}

fn castle_stage(scene: &MemoryScene, handles: &[SceneObjectHandle]) -> Stage {
    let mut stage = Stage::with_id("ABC-1", "Castle");
    stage.add_bound_prop(scene, handles[0], ROOT_PARENT_ID);
    stage.add_bound_prop(scene, handles[1], 0);
    stage.add_prop(0).set_name("Courtyard");
    stage
}

// --- Tests ---

#[tokio::test]
async fn scene_to_file_and_back_rebinds_handles() -> Result<()> {
    let (scene, handles) = castle_scene();
    let stage = castle_stage(&scene, &handles);
    let converter = StageConverter::with_resolver(scene.clone());

    let dir = tempdir()?;
    let path = dir.path().join("castle.stage.json");
    std::fs::write(&path, converter.encode(&stage, true)?)?;

    let text = std::fs::read_to_string(&path)?;
    let loaded = converter.decode(&text).await?;

    assert_eq!(loaded, stage);
    assert_eq!(loaded.prop_by_object(handles[1]).map(|p| p.name()), Some("Lantern"));
    let lit = loaded.props_with_capability::<Lantern>();
    assert_eq!(lit.len(), 1);
    let lantern = lit[0]
        .component(1)
        .and_then(|c| c.bound_capability())
        .and_then(|c| c.downcast_ref::<Lantern>())
        .map(|l| l.lumens);
    assert_eq!(lantern, Some(450));
    Ok(())
}

#[tokio::test]
async fn unresolvable_reference_fails_the_whole_decode() -> Result<()> {
    let (scene, handles) = castle_scene();
    let stage = castle_stage(&scene, &handles);
    let text = StageConverter::detached().encode(&stage, false)?;

    // A scene that lost the lantern cannot resolve it.
    let mut empty = MemoryScene::default();
    empty.spawn(1, "castle/Keep", vec![]);
    let converter = StageConverter::with_resolver(Arc::new(empty));

    let err = converter.decode(&text).await.unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Resolution(ResolveError::Unresolved { ref reference }) if reference == "castle/Keep/Lantern"
    ));
    Ok(())
}

#[test]
fn blocking_and_async_decode_agree() -> Result<()> {
    let (scene, handles) = castle_scene();
    let stage = castle_stage(&scene, &handles);
    let converter = StageConverter::with_resolver(scene);
    let text = converter.encode(&stage, false)?;

    let blocking = converter.decode_blocking(&text)?;
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let awaited = runtime.block_on(converter.decode(&text))?;

    assert_eq!(blocking, awaited);
    assert_eq!(blocking.content_hash(), stage.content_hash());
    Ok(())
}

#[test]
fn clone_round_trip_and_order_laws() -> Result<()> {
    let (scene, handles) = castle_scene();
    let stage = castle_stage(&scene, &handles);

    let copy = stage.clone();
    assert_eq!(copy.content_hash(), stage.content_hash());

    let mut reordered = copy.clone();
    assert!(reordered.swap_props(1, 2));
    assert_ne!(reordered.content_hash(), stage.content_hash());

    let detached = StageConverter::detached();
    let text = detached.encode(&reordered, false)?;
    let decoded = detached.decode_blocking(&text)?;
    assert_eq!(decoded, reordered);
    assert_eq!(decoded.props()[1].name(), "Courtyard");
    Ok(())
}

#[test]
fn newer_schema_is_refused() -> Result<()> {
    let (scene, handles) = castle_scene();
    let stage = castle_stage(&scene, &handles);
    let mut document: serde_json::Value =
        serde_json::from_str(&StageConverter::detached().encode(&stage, false)?)?;
    document["version"] = json!(3);

    let err = StageConverter::detached()
        .decode_blocking(&document.to_string())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Stage decoding failed: version 3 is not supported (expected 2)"
    );
    Ok(())
}

#[test]
fn observer_sees_props_captured_from_the_scene() {
    let (scene, handles) = castle_scene();
    let bus = EventBus::<StageEvent>::new();
    let mut stage = Stage::with_id("observed", "Castle");
    stage.attach_observer(bus.sender());

    stage.add_bound_prop(scene.as_ref(), handles[1], ROOT_PARENT_ID);
    stage.add_bound_prop(scene.as_ref(), SceneObjectHandle::NULL, ROOT_PARENT_ID);

    let events = bus.drain();
    assert_eq!(events.len(), 1);
    let StageEvent::PropAdded { stage_id, prop } = &events[0];
    assert_eq!(stage_id, "observed");
    assert_eq!(prop.name(), "Lantern");
    assert_eq!(prop.component_count(), 2);
}
