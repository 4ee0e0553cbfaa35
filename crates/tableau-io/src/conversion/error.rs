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

//! Errors raised by the conversion engine.

use std::fmt;
use tableau_core::resolve::ResolveError;

/// An error that can occur while encoding a stage.
#[derive(Debug)]
pub enum EncodeError {
    /// The definition could not be written as JSON.
    Serialization(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Serialization(msg) => write!(f, "Stage encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// An error that can occur while decoding a stage.
///
/// A decode that returns any of these produced no stage at all.
#[derive(Debug)]
pub enum DecodeError {
    /// The text is not a well-formed stage document.
    Malformed(String),
    /// The document was written under a schema version this engine does not read.
    UnsupportedVersion {
        /// Version found in the document.
        found: u16,
        /// The only version this engine accepts.
        supported: u16,
    },
    /// The resolver failed to produce live handles.
    Resolution(ResolveError),
    /// The resolver's answer does not line up with the requests it was given.
    BindingMismatch(String),
    /// The decode was cancelled before it completed.
    Cancelled,
    /// A blocking decode was attempted from inside an async runtime.
    BlockingInAsyncContext,
    /// The private runtime for a blocking decode could not be started.
    Runtime(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(msg) => write!(f, "Stage decoding failed: Malformed - {msg}"),
            DecodeError::UnsupportedVersion { found, supported } => write!(
                f,
                "Stage decoding failed: version {found} is not supported (expected {supported})"
            ),
            DecodeError::Resolution(e) => write!(f, "Stage decoding failed: {e}"),
            DecodeError::BindingMismatch(msg) => {
                write!(f, "Stage decoding failed: Binding mismatch - {msg}")
            }
            DecodeError::Cancelled => write!(f, "Stage decoding was cancelled"),
            DecodeError::BlockingInAsyncContext => write!(
                f,
                "Blocking stage decode called from inside an async runtime; await `decode` instead"
            ),
            DecodeError::Runtime(msg) => {
                write!(f, "Stage decoding failed: could not start runtime - {msg}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Resolution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for DecodeError {
    fn from(e: ResolveError) -> Self {
        DecodeError::Resolution(e)
    }
}
