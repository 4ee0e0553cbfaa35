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

//! The reference-resolution contract consulted while decoding a stage.
//!
//! A persisted stage only stores stable references (`objectRef` on props,
//! `reference` on components). Turning them back into live handles is the
//! host's job, and it may need I/O to do it, so the contract is asynchronous.
//! A decode gathers every reference first and makes exactly one
//! [`ReferenceResolver::resolve`] call.

use crate::host::{Capability, SceneObjectHandle};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// One persisted reference that needs a live handle.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceRequest {
    /// A prop's bound scene object.
    Object {
        /// Position of the prop in the stage.
        prop_index: usize,
        /// The persisted stable identity.
        reference: String,
    },
    /// A component's bound capability.
    Capability {
        /// Position of the owning prop in the stage.
        prop_index: usize,
        /// Position of the component in the prop.
        component_index: usize,
        /// The component's logical type.
        type_identifier: String,
        /// The persisted stable identity.
        reference: String,
        /// The component's payload, in case the host needs it to resolve.
        serialized_fields: Value,
    },
}

impl ReferenceRequest {
    /// The persisted reference text.
    pub fn reference(&self) -> &str {
        match self {
            ReferenceRequest::Object { reference, .. } => reference,
            ReferenceRequest::Capability { reference, .. } => reference,
        }
    }
}

/// A live handle produced for a [`ReferenceRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Answers an [`ReferenceRequest::Object`].
    Object(SceneObjectHandle),
    /// Answers an [`ReferenceRequest::Capability`].
    Capability(Capability),
}

/// An error reported by a [`ReferenceResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The host knows nothing about the reference.
    Unresolved {
        /// The reference that could not be resolved.
        reference: String,
    },
    /// The host could not be reached or failed while resolving.
    HostFailure(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Unresolved { reference } => {
                write!(f, "Reference '{reference}' could not be resolved")
            }
            ResolveError::HostFailure(msg) => write!(f, "Host failed to resolve references: {msg}"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolves persisted references back to live handles.
///
/// The returned vector must hold one [`Binding`] per request, in request
/// order, with the variant matching the request's kind. Any error fails the
/// whole decode.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Resolves every request of one decode in a single call.
    ///
    /// ## Arguments
    /// * `requests` - Every persisted reference of the document, props before
    ///   their components.
    ///
    /// ## Returns
    /// One binding per request, in request order.
    ///
    /// ## Errors
    /// * `ResolveError::Unresolved` - If a reference names nothing live.
    /// * `ResolveError::HostFailure` - If the host itself could not answer.
    async fn resolve(&self, requests: &[ReferenceRequest]) -> Result<Vec<Binding>, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TableResolver {
        objects: HashMap<String, u64>,
    }

    #[async_trait]
    impl ReferenceResolver for TableResolver {
        async fn resolve(
            &self,
            requests: &[ReferenceRequest],
        ) -> Result<Vec<Binding>, ResolveError> {
            requests
                .iter()
                .map(|request| match request {
                    ReferenceRequest::Object { reference, .. } => self
                        .objects
                        .get(reference)
                        .map(|raw| Binding::Object(SceneObjectHandle::from_raw(*raw)))
                        .ok_or_else(|| ResolveError::Unresolved {
                            reference: reference.clone(),
                        }),
                    ReferenceRequest::Capability { .. } => {
                        Err(ResolveError::HostFailure("no capabilities".to_string()))
                    }
                })
                .collect()
        }
    }

    fn object_request(reference: &str) -> ReferenceRequest {
        ReferenceRequest::Object {
            prop_index: 0,
            reference: reference.to_string(),
        }
    }

    #[tokio::test]
    async fn resolver_answers_in_request_order() {
        let resolver = TableResolver {
            objects: HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
        };
        let bindings = resolver
            .resolve(&[object_request("b"), object_request("a")])
            .await
            .expect("both references are known");
        assert_eq!(
            bindings,
            vec![
                Binding::Object(SceneObjectHandle::from_raw(2)),
                Binding::Object(SceneObjectHandle::from_raw(1)),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_reference_is_reported() {
        let resolver = TableResolver {
            objects: HashMap::new(),
        };
        let err = resolver
            .resolve(&[object_request("missing")])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Unresolved {
                reference: "missing".to_string()
            }
        );
        assert_eq!(err.to_string(), "Reference 'missing' could not be resolved");
    }

    #[test]
    fn request_exposes_its_reference() {
        let request = ReferenceRequest::Capability {
            prop_index: 1,
            component_index: 0,
            type_identifier: "Light".to_string(),
            reference: "lights/sun".to_string(),
            serialized_fields: Value::Null,
        };
        assert_eq!(request.reference(), "lights/sun");
    }
}
