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

use super::{DecodeError, EncodeError, StageConverter};
use tableau_data::Stage;

/// JSON conversion directly on [`Stage`], through a detached converter.
///
/// Stages decoded this way keep their references as text and have no live
/// handles. Use a [`StageConverter`] with a resolver to re-bind them.
pub trait StageJsonExt: Sized {
    /// Encodes the stage. `pretty` only controls whitespace.
    fn to_json(&self, pretty: bool) -> Result<String, EncodeError>;

    /// Decodes a stage without resolving references.
    fn from_json(text: &str) -> Result<Self, DecodeError>;
}

impl StageJsonExt for Stage {
    fn to_json(&self, pretty: bool) -> Result<String, EncodeError> {
        StageConverter::detached().encode(self, pretty)
    }

    fn from_json(text: &str) -> Result<Self, DecodeError> {
        StageConverter::detached().decode_blocking(text)
    }
}
