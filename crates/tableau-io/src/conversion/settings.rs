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

use serde::{Deserialize, Serialize};

/// Tunables for a [`StageConverter`](super::StageConverter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Whitespace formatting used by `encode_default`. Never affects content.
    pub pretty_print: bool,
    /// When `false`, decoding keeps persisted references as text and leaves
    /// every handle unbound, even if a resolver is configured.
    pub resolve_references: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            pretty_print: false,
            resolve_references: true,
        }
    }
}

impl ConversionSettings {
    /// Reads settings from a JSON object; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings = ConversionSettings::from_json(r#"{"prettyPrint": true}"#)
            .expect("settings parse");
        assert!(settings.pretty_print);
        assert!(settings.resolve_references);
    }

    #[test]
    fn empty_object_is_default() {
        let settings = ConversionSettings::from_json("{}").expect("settings parse");
        assert_eq!(settings, ConversionSettings::default());
    }
}
