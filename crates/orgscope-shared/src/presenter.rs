//! Tree Presenter: read-only projections of the forest for display.
//!
//! One ordering everywhere: level descending (`l5` first), then name
//! ascending, compared case-insensitively with an exact-byte tiebreak, then
//! identity. Lists, trees and level groups all use `seniority_order`.

use crate::employee::{EmployeeRecord, Identity, Level};
use crate::hierarchy::{Forest, HierarchyNode};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Display projection of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedNode {
    pub identity: Identity,
    pub name: String,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub department: String,
    pub manager_name: String,
    pub depth: usize,
    /// Number of direct reports, kept even when `children` is not populated
    pub direct_reports: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PresentedNode>,
}

impl PresentedNode {
    fn leaf(node: &HierarchyNode, depth: usize) -> Self {
        Self {
            identity: node.identity.clone(),
            name: node.record.name.clone(),
            level: node.record.level.clone(),
            designation: node.record.designation.clone(),
            department: node.record.department.clone(),
            manager_name: node.record.manager_name.clone(),
            depth,
            direct_reports: node.children.len(),
            children: Vec::new(),
        }
    }

    /// This node and everything below it, pre-order
    pub fn flatten(&self) -> Vec<&PresentedNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Compare display names: case-insensitive first, exact second
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Seniority-first ordering for records
pub fn seniority_order(a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
    b.level
        .cmp(&a.level)
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn node_order(a: &HierarchyNode, b: &HierarchyNode) -> Ordering {
    seniority_order(&a.record, &b.record).then_with(|| a.identity.cmp(&b.identity))
}

fn presented_order(a: &PresentedNode, b: &PresentedNode) -> Ordering {
    b.level
        .cmp(&a.level)
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.identity.cmp(&b.identity))
}

fn sorted_children(node: &HierarchyNode) -> Vec<&HierarchyNode> {
    let mut children: Vec<&HierarchyNode> = node.children.iter().collect();
    children.sort_by(|a, b| node_order(a, b));
    children
}

/// Pre-order walk with an explicit stack, then fold back up from the end.
/// Every node sits after its parent, so popping attaches complete subtrees.
fn present_node(root: &HierarchyNode, base_depth: usize) -> PresentedNode {
    let mut built: Vec<PresentedNode> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut stack: Vec<(&HierarchyNode, Option<usize>)> = sorted_children(root)
        .into_iter()
        .rev()
        .map(|child| (child, None))
        .collect();

    while let Some((node, parent)) = stack.pop() {
        let position = built.len();
        built.push(PresentedNode::leaf(node, node.depth - base_depth));
        parents.push(parent);
        stack.extend(
            sorted_children(node)
                .into_iter()
                .rev()
                .map(|child| (child, Some(position))),
        );
    }

    let mut top = PresentedNode::leaf(root, root.depth - base_depth);
    while let Some(mut node) = built.pop() {
        // children arrived last-first
        node.children.reverse();
        match parents[built.len()] {
            Some(parent) => built[parent].children.push(node),
            None => top.children.push(node),
        }
    }
    top.children.reverse();
    top
}

/// Whole forest, ordered at every level
pub fn present(forest: &Forest) -> Vec<PresentedNode> {
    let mut roots: Vec<&HierarchyNode> = forest.roots().iter().collect();
    roots.sort_by(|a, b| node_order(a, b));
    roots.into_iter().map(|root| present_node(root, 0)).collect()
}

/// Every node grouped by level, flat within each group. Iterate the map in
/// reverse for senior-first display.
pub fn present_leveled(forest: &Forest) -> BTreeMap<Level, Vec<PresentedNode>> {
    let mut groups: BTreeMap<Level, Vec<PresentedNode>> = BTreeMap::new();
    for node in forest.iter() {
        groups
            .entry(node.record.level.clone())
            .or_default()
            .push(PresentedNode::leaf(node, node.depth));
    }
    for nodes in groups.values_mut() {
        nodes.sort_by(presented_order);
    }
    groups
}

/// The team under one employee, with that employee at depth 0
pub fn present_subtree(forest: &Forest, identity: &str) -> Option<PresentedNode> {
    let node = forest.find(identity)?;
    Some(present_node(node, node.depth))
}
