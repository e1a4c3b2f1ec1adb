//! Descendant Index: "everyone under X" in O(1) after an O(n) build.
//!
//! The forest is flattened pre-order once. A node's transitive reports are
//! then the contiguous run right after it, and the run length comes from
//! subtree sizes accumulated upward in a single reverse pass.

use crate::employee::{EmployeeRecord, Identity};
use crate::hierarchy::Forest;
use crate::identity::NameMatch;
use crate::presenter::seniority_order;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct DescendantIndex {
    /// Records in pre-order
    records: Vec<EmployeeRecord>,
    identities: Vec<Identity>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    depth: Vec<usize>,
    /// Subtree size including the node itself
    size: Vec<usize>,
    position: HashMap<Identity, usize>,
    by_name: HashMap<String, Vec<usize>>,
    name_match: NameMatch,
}

impl DescendantIndex {
    pub fn build(forest: &Forest) -> Self {
        Self::build_with(forest, NameMatch::default())
    }

    /// Build with the name matching used for actor lookups
    pub fn build_with(forest: &Forest, name_match: NameMatch) -> Self {
        let mut index = Self {
            name_match,
            ..Default::default()
        };

        // (node, parent position)
        let mut stack: Vec<_> = forest.roots().iter().rev().map(|root| (root, None)).collect();
        while let Some((node, parent)) = stack.pop() {
            let position = index.records.len();
            index.records.push(node.record.clone());
            index.identities.push(node.identity.clone());
            index.parent.push(parent);
            index.children.push(Vec::new());
            index.depth.push(node.depth);
            index.size.push(1);
            index.position.insert(node.identity.clone(), position);
            index
                .by_name
                .entry(name_match.key(&node.record.name))
                .or_default()
                .push(position);
            if let Some(p) = parent {
                index.children[p].push(position);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, Some(position))));
        }

        // Children always sit after their parent in pre-order.
        for position in (0..index.records.len()).rev() {
            if let Some(p) = index.parent[position] {
                index.size[p] += index.size[position];
            }
        }

        debug!(nodes = index.records.len(), "descendant index built");
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.position.contains_key(identity)
    }

    /// Every indexed record, pre-order
    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn get(&self, identity: &str) -> Option<&EmployeeRecord> {
        self.position.get(identity).map(|p| &self.records[*p])
    }

    pub fn depth_of(&self, identity: &str) -> Option<usize> {
        self.position.get(identity).map(|p| self.depth[*p])
    }

    /// Direct and transitive reports, pre-order. Unknown identities yield an
    /// empty slice.
    pub fn descendants_of(&self, identity: &str) -> &[EmployeeRecord] {
        match self.position.get(identity) {
            Some(&p) => &self.records[p + 1..p + self.size[p]],
            None => &[],
        }
    }

    /// Identities matching `descendants_of`
    pub fn descendant_identities_of(&self, identity: &str) -> &[Identity] {
        match self.position.get(identity) {
            Some(&p) => &self.identities[p + 1..p + self.size[p]],
            None => &[],
        }
    }

    /// Number of transitive reports
    pub fn headcount_under(&self, identity: &str) -> usize {
        self.position
            .get(identity)
            .map(|p| self.size[*p] - 1)
            .unwrap_or(0)
    }

    /// Direct reports in presentation order (level desc, name asc)
    pub fn direct_reports_of(&self, identity: &str) -> Vec<(&Identity, &EmployeeRecord)> {
        let Some(&p) = self.position.get(identity) else {
            return Vec::new();
        };
        let mut reports: Vec<_> = self.children[p]
            .iter()
            .map(|c| (&self.identities[*c], &self.records[*c]))
            .collect();
        reports.sort_by(|a, b| seniority_order(a.1, b.1));
        reports
    }

    /// The record's resolved manager, if it is not a root
    pub fn manager_of(&self, identity: &str) -> Option<(&Identity, &EmployeeRecord)> {
        let p = self.position.get(identity)?;
        self.parent[*p].map(|m| (&self.identities[m], &self.records[m]))
    }

    /// Find an actor given either an identity or a display name. Names
    /// shared by several employees do not resolve.
    pub fn lookup_actor(&self, actor: &str) -> Option<&Identity> {
        let actor = actor.trim();
        if actor.is_empty() {
            return None;
        }
        if let Some(p) = self.position.get(actor) {
            return Some(&self.identities[*p]);
        }
        match self.by_name.get(&self.name_match.key(actor)).map(Vec::as_slice) {
            Some([only]) => Some(&self.identities[*only]),
            Some(several) if several.len() > 1 => {
                debug!(actor, matches = several.len(), "actor name is ambiguous");
                None
            }
            _ => None,
        }
    }
}
