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

//! The stage conversion engine.

use super::{ConversionSettings, DecodeError, EncodeError};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tableau_core::resolve::{Binding, ReferenceRequest, ReferenceResolver};
use tableau_data::{Prop, Stage, StageDefinition, CURRENT_VERSION};

/// Encodes stages to JSON and decodes them back.
///
/// A converter built with [`StageConverter::detached`] never consults a host:
/// persisted references stay as text and every live handle stays unbound.
/// One built with [`StageConverter::with_resolver`] re-binds them on decode.
#[derive(Clone, Default)]
pub struct StageConverter {
    resolver: Option<Arc<dyn ReferenceResolver>>,
    settings: ConversionSettings,
}

/// A parsed, version-checked document whose props are built but not yet bound.
struct PreparedStage {
    version: u16,
    id: String,
    display_name: String,
    props: Vec<Prop>,
    requests: Vec<ReferenceRequest>,
}

impl StageConverter {
    /// A converter with no resolver.
    pub fn detached() -> Self {
        Self::default()
    }

    /// A converter that re-binds handles through `resolver`.
    pub fn with_resolver(resolver: Arc<dyn ReferenceResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            settings: ConversionSettings::default(),
        }
    }

    /// Replaces the converter's settings.
    pub fn with_settings(mut self, settings: ConversionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The active settings.
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// The schema version this engine writes and reads.
    pub const fn current_version(&self) -> u16 {
        CURRENT_VERSION
    }

    // --- Encoding ---

    /// Encodes `stage`. `pretty` only controls whitespace.
    pub fn encode(&self, stage: &Stage, pretty: bool) -> Result<String, EncodeError> {
        let definition = StageDefinition::from(stage);
        let encoded = if pretty {
            serde_json::to_string_pretty(&definition)
        } else {
            serde_json::to_string(&definition)
        };
        let text = encoded.map_err(|e| EncodeError::Serialization(e.to_string()))?;
        log::trace!(
            "Encoded stage '{}' ({} props, {} bytes).",
            stage.id(),
            stage.len(),
            text.len()
        );
        Ok(text)
    }

    /// Encodes `stage` using the configured `pretty_print` setting.
    pub fn encode_default(&self, stage: &Stage) -> Result<String, EncodeError> {
        self.encode(stage, self.settings.pretty_print)
    }

    // --- Decoding ---

    /// Decodes a stage, resolving its references in a single resolver call.
    pub async fn decode(&self, text: &str) -> Result<Stage, DecodeError> {
        self.decode_inner(text)
            .await
            .inspect_err(|e| log::warn!("{e}"))
    }

    /// Decodes a stage unless `cancel` completes first.
    ///
    /// A cancelled decode returns [`DecodeError::Cancelled`]; whatever was
    /// built so far is dropped.
    pub async fn decode_until<C>(&self, text: &str, cancel: C) -> Result<Stage, DecodeError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                log::debug!("Stage decode cancelled.");
                Err(DecodeError::Cancelled)
            }
            result = self.decode(text) => result,
        }
    }

    /// Runs [`decode`](Self::decode) to completion on the calling thread.
    ///
    /// Documents that need no resolution are decoded inline. Otherwise a
    /// private current-thread runtime drives the resolver, which is refused
    /// with [`DecodeError::BlockingInAsyncContext`] if the caller is already
    /// inside a tokio runtime.
    pub fn decode_blocking(&self, text: &str) -> Result<Stage, DecodeError> {
        self.decode_blocking_inner(text)
            .inspect_err(|e| log::warn!("{e}"))
    }

    async fn decode_inner(&self, text: &str) -> Result<Stage, DecodeError> {
        let prepared = self.prepare(text)?;
        match self.active_resolver(&prepared) {
            Some(resolver) => prepared.resolve_with(resolver).await,
            None => Ok(prepared.finish()),
        }
    }

    fn decode_blocking_inner(&self, text: &str) -> Result<Stage, DecodeError> {
        let prepared = self.prepare(text)?;
        let Some(resolver) = self.active_resolver(&prepared) else {
            return Ok(prepared.finish());
        };
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(DecodeError::BlockingInAsyncContext);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DecodeError::Runtime(e.to_string()))?;
        runtime.block_on(prepared.resolve_with(resolver))
    }

    fn active_resolver(&self, prepared: &PreparedStage) -> Option<&dyn ReferenceResolver> {
        if prepared.requests.is_empty() || !self.settings.resolve_references {
            return None;
        }
        self.resolver.as_deref()
    }

    fn prepare(&self, text: &str) -> Result<PreparedStage, DecodeError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        // Check the version before the layout, so that a document from another
        // schema is reported as such rather than as malformed.
        let version = document
            .get("version")
            .ok_or_else(|| DecodeError::Malformed("missing field `version`".to_string()))?
            .as_u64()
            .and_then(|v| u16::try_from(v).ok())
            .ok_or_else(|| {
                DecodeError::Malformed("`version` is not an unsigned 16-bit integer".to_string())
            })?;
        if version != CURRENT_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                found: version,
                supported: CURRENT_VERSION,
            });
        }

        let definition: StageDefinition =
            serde_json::from_value(document).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let requests = Self::collect_requests(&definition);

        let StageDefinition {
            version,
            id,
            display_name,
            props,
        } = definition;
        Ok(PreparedStage {
            version,
            id,
            display_name,
            props: props.into_iter().map(Prop::from).collect(),
            requests,
        })
    }

    fn collect_requests(definition: &StageDefinition) -> Vec<ReferenceRequest> {
        definition
            .references()
            .map(|(prop_index, component_index, reference)| match component_index {
                None => ReferenceRequest::Object {
                    prop_index,
                    reference: reference.to_string(),
                },
                Some(component_index) => {
                    let component = &definition.props[prop_index].components[component_index];
                    ReferenceRequest::Capability {
                        prop_index,
                        component_index,
                        type_identifier: component.type_identifier.clone(),
                        reference: reference.to_string(),
                        serialized_fields: component.serialized_fields.clone(),
                    }
                }
            })
            .collect()
    }
}

impl PreparedStage {
    async fn resolve_with(mut self, resolver: &dyn ReferenceResolver) -> Result<Stage, DecodeError> {
        log::debug!(
            "Resolving {} references for stage '{}'.",
            self.requests.len(),
            self.id
        );
        let bindings = resolver.resolve(&self.requests).await?;
        self.bind(bindings)?;
        Ok(self.finish())
    }

    fn bind(&mut self, bindings: Vec<Binding>) -> Result<(), DecodeError> {
        if bindings.len() != self.requests.len() {
            return Err(DecodeError::BindingMismatch(format!(
                "{} requests answered with {} bindings",
                self.requests.len(),
                bindings.len()
            )));
        }

        for (request, binding) in self.requests.iter().zip(bindings) {
            match (request, binding) {
                (ReferenceRequest::Object { prop_index, .. }, Binding::Object(handle)) => {
                    self.props[*prop_index].bind_object(handle);
                }
                (
                    ReferenceRequest::Capability {
                        prop_index,
                        component_index,
                        ..
                    },
                    Binding::Capability(capability),
                ) => {
                    let component = self.props[*prop_index]
                        .component_mut(*component_index)
                        .ok_or_else(|| {
                            DecodeError::BindingMismatch(format!(
                                "prop {prop_index} has no component {component_index}"
                            ))
                        })?;
                    component.bind(capability);
                }
                (request, _) => {
                    return Err(DecodeError::BindingMismatch(format!(
                        "reference '{}' was answered with the wrong kind of handle",
                        request.reference()
                    )));
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Stage {
        Stage::from_parts(self.version, self.id, self.display_name, self.props)
    }
}
