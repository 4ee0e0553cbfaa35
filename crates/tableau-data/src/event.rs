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

//! Notifications emitted by a stage to its attached observer.

use crate::prop::Prop;

/// An event published on a stage's observer channel.
///
/// Events are sent synchronously from inside the mutating call, on whatever
/// thread performs it. Use a `tableau_core::EventBus<StageEvent>` to own the
/// receiving end.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// A prop was appended to a stage.
    PropAdded {
        /// Id of the stage that received the prop.
        stage_id: String,
        /// Snapshot of the prop as it was appended.
        prop: Prop,
    },
}
