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

//! # Tableau Core
//!
//! Foundational crate containing identifiers, host contracts, and event
//! primitives shared by the stage data model and the conversion engine.
//!
//! Nothing in here knows what a stage looks like. Higher-level crates build
//! on these contracts without ever importing host-specific types.

#![warn(missing_docs)]

pub mod event;
pub mod host;
pub mod id;
pub mod resolve;

pub use event::EventBus;
pub use host::{Capability, ComponentBinding, ObjectIdentity, SceneHost, SceneObjectHandle};
pub use id::{NamespacedStageIdGenerator, StageIdGenerator, UuidStageIdGenerator};
pub use resolve::{Binding, ReferenceRequest, ReferenceResolver, ResolveError};
