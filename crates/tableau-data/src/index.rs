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

//! The lazily built id -> position index of a stage's prop arena.

use crate::prop::Prop;
use ahash::AHashMap;
use std::cell::OnceCell;

/// Maps prop ids to their position in the owning stage's arena.
///
/// Built on first lookup. Appends update a built index in place; any other
/// structural change must call [`PropIndex::invalidate`]. When several props
/// share an id, the one added last wins.
#[derive(Debug, Default)]
pub(crate) struct PropIndex {
    positions: OnceCell<AHashMap<i32, usize>>,
}

impl PropIndex {
    /// Returns the arena position of `id`, building the index if needed.
    pub(crate) fn position(&self, id: i32, props: &[Prop]) -> Option<usize> {
        self.positions
            .get_or_init(|| Self::build(props))
            .get(&id)
            .copied()
    }

    /// Records an append. A no-op while the index is unbuilt.
    pub(crate) fn record(&mut self, id: i32, position: usize) {
        if let Some(positions) = self.positions.get_mut() {
            positions.insert(id, position);
        }
    }

    /// Drops the index; the next lookup rebuilds it.
    pub(crate) fn invalidate(&mut self) {
        if self.positions.take().is_some() {
            log::trace!("Prop index invalidated.");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self) -> bool {
        self.positions.get().is_some()
    }

    fn build(props: &[Prop]) -> AHashMap<i32, usize> {
        log::trace!("Building prop index over {} props.", props.len());
        // Later props overwrite earlier ones with the same id.
        props
            .iter()
            .enumerate()
            .map(|(position, prop)| (prop.id(), position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop::ROOT_PARENT_ID;

    fn props(ids: &[i32]) -> Vec<Prop> {
        ids.iter()
            .map(|id| Prop::new(*id, ROOT_PARENT_ID, format!("p{id}")))
            .collect()
    }

    #[test]
    fn index_is_built_on_first_lookup() {
        let arena = props(&[0, 1, 2]);
        let index = PropIndex::default();
        assert!(!index.is_built());
        assert_eq!(index.position(2, &arena), Some(2));
        assert!(index.is_built());
        assert_eq!(index.position(9, &arena), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_last_position() {
        let arena = props(&[5, 1, 5]);
        let index = PropIndex::default();
        assert_eq!(index.position(5, &arena), Some(2));
    }

    #[test]
    fn record_is_ignored_until_built() {
        let mut index = PropIndex::default();
        index.record(0, 0);
        assert!(!index.is_built());
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut arena = props(&[0, 1]);
        let mut index = PropIndex::default();
        assert_eq!(index.position(1, &arena), Some(1));

        arena.swap(0, 1);
        index.invalidate();
        assert!(!index.is_built());
        assert_eq!(index.position(1, &arena), Some(0));
    }
}
