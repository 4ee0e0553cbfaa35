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

//! # Tableau Data
//!
//! The stage data model: a [`Stage`] owns an ordered arena of [`Prop`]s, each
//! carrying an ordered list of [`Component`]s. Parent links are ids resolved
//! through the stage's lazily built index, never direct references.
//!
//! The persisted layout lives in [`definition`]; turning it into text and back
//! is the job of `tableau-io`.

#![warn(missing_docs)]

pub mod component;
pub mod definition;
pub mod event;
mod hash;
pub mod hierarchy;
mod index;
pub mod prop;
pub mod stage;

pub use component::Component;
pub use definition::{ComponentDefinition, PropDefinition, StageDefinition};
pub use event::StageEvent;
pub use hierarchy::HierarchyReport;
pub use prop::{Prop, ROOT_PARENT_ID};
pub use stage::{Stage, CURRENT_VERSION};
