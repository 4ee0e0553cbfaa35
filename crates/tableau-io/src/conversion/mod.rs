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

//! Bidirectional mapping between a stage and its JSON encoding.
//!
//! Encoding is synchronous and pure. Decoding is asynchronous because it may
//! have to ask the host to resolve persisted references; it has exactly one
//! suspension point and either returns a fully bound stage or an error.

mod converter;
mod error;
mod ext;
mod settings;

pub use converter::StageConverter;
pub use error::{DecodeError, EncodeError};
pub use ext::StageJsonExt;
pub use settings::ConversionSettings;
