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

//! Parent/child queries over a stage's prop arena.
//!
//! Parent links are plain ids, so nothing stops a stage from holding a
//! dangling parent or a cycle. These helpers resolve links through the id
//! index and report such problems without rejecting them.

use crate::prop::Prop;
use crate::stage::Stage;

/// Problems found in a stage's parent links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyReport {
    /// `(prop id, parent id)` pairs whose parent id resolves to no prop.
    pub dangling: Vec<(i32, i32)>,
    /// Ids of props that name themselves as parent.
    pub self_parented: Vec<i32>,
    /// Parent cycles longer than one prop, as prop ids in link order.
    pub cycles: Vec<Vec<i32>>,
}

impl HierarchyReport {
    /// Returns `true` if every parent link resolves and no cycle exists.
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.self_parented.is_empty() && self.cycles.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    OnPath,
    Done,
}

impl Stage {
    /// The prop `prop` names as its parent, if it resolves.
    pub fn parent_of(&self, prop: &Prop) -> Option<&Prop> {
        if prop.is_root() {
            return None;
        }
        self.prop(prop.parent_id())
    }

    /// Props whose parent id is `id`, in stage order.
    pub fn children_of(&self, id: i32) -> Vec<&Prop> {
        self.iter().filter(|prop| prop.parent_id() == id).collect()
    }

    /// Props with no parent, in stage order.
    pub fn roots(&self) -> Vec<&Prop> {
        self.iter().filter(|prop| prop.is_root()).collect()
    }

    /// Walks every parent chain once and reports dangling links and cycles.
    pub fn diagnose_hierarchy(&self) -> HierarchyReport {
        let props = self.props();
        let positions: Vec<Option<usize>> = props
            .iter()
            .map(|prop| {
                if prop.is_root() {
                    None
                } else {
                    self.position_of(prop.parent_id())
                }
            })
            .collect();

        let mut report = HierarchyReport::default();
        let mut state = vec![Visit::Pending; props.len()];

        for start in 0..props.len() {
            let mut path = Vec::new();
            let mut current = start;
            loop {
                if state[current] != Visit::Pending {
                    break;
                }
                state[current] = Visit::OnPath;
                path.push(current);

                let prop = &props[current];
                if prop.is_root() {
                    break;
                }
                match positions[current] {
                    Some(next) => current = next,
                    None => {
                        report.dangling.push((prop.id(), prop.parent_id()));
                        break;
                    }
                }
            }

            if state[current] == Visit::OnPath && !path.is_empty() {
                if let Some(entry) = path.iter().position(|p| *p == current) {
                    let cycle: Vec<i32> = path[entry..].iter().map(|p| props[*p].id()).collect();
                    // A walk that stopped on a root or dangling link ends on
                    // its own last element without closing a loop.
                    let closed = positions[*path.last().unwrap_or(&current)] == Some(current);
                    if closed {
                        if cycle.len() == 1 {
                            report.self_parented.push(cycle[0]);
                        } else {
                            report.cycles.push(cycle);
                        }
                    }
                }
            }

            for position in path {
                state[position] = Visit::Done;
            }
        }

        if !report.is_clean() {
            log::debug!(
                "Stage '{}' hierarchy: {} dangling, {} self-parented, {} cycles.",
                self.id(),
                report.dangling.len(),
                report.self_parented.len(),
                report.cycles.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop::ROOT_PARENT_ID;

    fn stage_with_parents(parents: &[i32]) -> Stage {
        let mut stage = Stage::with_id("h", "Hierarchy");
        for parent in parents {
            stage.add_prop(*parent);
        }
        stage
    }

    #[test]
    fn parent_and_children_resolve_through_ids() {
        let stage = stage_with_parents(&[ROOT_PARENT_ID, 0, 0, 1]);
        let leaf = stage.prop(3).expect("leaf exists");
        assert_eq!(stage.parent_of(leaf).map(Prop::id), Some(1));
        assert!(stage.parent_of(stage.prop(0).expect("root exists")).is_none());

        let children: Vec<_> = stage.children_of(0).into_iter().map(Prop::id).collect();
        assert_eq!(children, vec![1, 2]);
        assert_eq!(stage.roots().len(), 1);
    }

    #[test]
    fn tree_is_clean() {
        let stage = stage_with_parents(&[ROOT_PARENT_ID, 0, 1, 1]);
        assert!(stage.diagnose_hierarchy().is_clean());
    }

    #[test]
    fn dangling_parent_is_reported() {
        let stage = stage_with_parents(&[ROOT_PARENT_ID, 42]);
        let report = stage.diagnose_hierarchy();
        assert_eq!(report.dangling, vec![(1, 42)]);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn self_parent_is_reported() {
        let stage = stage_with_parents(&[0]);
        let report = stage.diagnose_hierarchy();
        assert_eq!(report.self_parented, vec![0]);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn cycle_is_reported_once() {
        // 0 -> 2 -> 1 -> 0, plus a root hanging off nothing.
        let stage = stage_with_parents(&[2, 0, 1, ROOT_PARENT_ID]);
        let report = stage.diagnose_hierarchy();
        assert_eq!(report.cycles.len(), 1);
        let mut members = report.cycles[0].clone();
        members.sort();
        assert_eq!(members, vec![0, 1, 2]);
        assert!(report.dangling.is_empty());
    }

    #[test]
    fn chain_into_cycle_reports_only_the_loop() {
        // 3 -> 0, and 0 <-> 1.
        let stage = stage_with_parents(&[1, 0, ROOT_PARENT_ID, 0]);
        let report = stage.diagnose_hierarchy();
        assert_eq!(report.cycles.len(), 1);
        let mut members = report.cycles[0].clone();
        members.sort();
        assert_eq!(members, vec![0, 1]);
    }
}
