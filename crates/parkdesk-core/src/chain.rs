// ── Extension chains ──
//
// Registrations form singly-linked chains through `parent_id`. The index
// inverts those links once per fetched list (`parent -> children`) so every
// per-row predicate is a map lookup instead of a scan.

use std::collections::{HashMap, HashSet};

use crate::model::{RecordId, Registration};

#[derive(Debug, Clone, Default)]
pub struct ChainIndex {
    children: HashMap<RecordId, Vec<RecordId>>,
    parents: HashMap<RecordId, RecordId>,
    seq: HashMap<RecordId, u32>,
}

impl ChainIndex {
    /// Index a list as fetched.
    pub fn build(rows: &[Registration]) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.seq.insert(row.id.clone(), row.extension_seq);
            if let Some(parent) = &row.parent_id {
                index
                    .children
                    .entry(parent.clone())
                    .or_default()
                    .push(row.id.clone());
                index.parents.insert(row.id.clone(), parent.clone());
            }
        }
        index
    }

    pub fn children(&self, id: &RecordId) -> &[RecordId] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// True iff no row in the indexed list names `id` as its parent.
    pub fn is_latest_in_chain(&self, id: &RecordId) -> bool {
        self.children(id).is_empty()
    }

    /// Extension is offered on the tail of a chain that is active or lapsed.
    pub fn can_extend(&self, row: &Registration) -> bool {
        !row.status.is_terminal() && self.is_latest_in_chain(&row.id) && row.status.is_extendable()
    }

    /// Smart extend follows the same gate as a plain extension; it only
    /// differs in which endpoint it calls.
    pub fn can_smart_extend(&self, row: &Registration) -> bool {
        self.can_extend(row)
    }

    /// Walk `parent_id` links up to the root. Links to rows outside the
    /// indexed list end the walk.
    pub fn root_of(&self, id: &RecordId) -> RecordId {
        let mut current = id.clone();
        let mut seen = HashSet::new();
        while let Some(parent) = self.parents.get(&current) {
            if !seen.insert(current.clone()) || !self.seq.contains_key(parent) {
                break;
            }
            current = parent.clone();
        }
        current
    }

    /// Every id in the chain containing `id`, root first, ordered by
    /// extension sequence.
    pub fn chain_for(&self, id: &RecordId) -> Vec<RecordId> {
        let root = self.root_of(id);
        let mut out = Vec::new();
        let mut stack = vec![root];
        let mut seen = HashSet::new();
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            stack.extend(self.children(&next).iter().cloned());
            out.push(next);
        }
        out.sort_by(|a, b| {
            let sa = self.seq.get(a).copied().unwrap_or_default();
            let sb = self.seq.get(b).copied().unwrap_or_default();
            sa.cmp(&sb).then_with(|| a.cmp(b))
        });
        out
    }
}
