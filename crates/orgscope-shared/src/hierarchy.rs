//! Hierarchy Builder: flat roster -> canonical forest.
//!
//! Manager links are resolved by display name (the roster's real join key),
//! falling back to `managerId` -> `id` when the name does not resolve. Every
//! active record lands in exactly one tree exactly once:
//!
//! - blank, self-referencing and dangling manager references make a root
//! - manager loops are cut at the first node of the loop met while walking
//!   up from records in roster order; that node becomes a root
//!
//! Nothing here fails on malformed data. Findings are returned as anomalies
//! next to the best-effort forest.

use crate::anomaly::{Anomaly, AnomalyKind, AnomalyLog};
use crate::config::HierarchyConfig;
use crate::employee::{EmployeeRecord, Identity};
use crate::identity::{IdentityResolver, ResolvedRoster};
use serde::Serialize;
use tracing::{debug, info};

/// One employee in the forest. A node owns its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub identity: Identity,
    pub record: EmployeeRecord,
    /// Direct reports in roster order
    pub children: Vec<HierarchyNode>,
    /// Distance from the root of this tree (root = 0)
    pub depth: usize,
    pub is_root: bool,
}

impl HierarchyNode {
    /// This node and every node below it, pre-order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, identity: &str) -> Option<&HierarchyNode> {
        self.iter().find(|node| node.identity.as_str() == identity)
    }
}

/// Pre-order walk over one or more subtrees
pub struct PreOrder<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Zero or more disjoint trees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Forest {
    roots: Vec<HierarchyNode>,
}

impl Forest {
    pub fn new(roots: Vec<HierarchyNode>) -> Self {
        Self { roots }
    }

    /// Roots in roster order
    pub fn roots(&self) -> &[HierarchyNode] {
        &self.roots
    }

    /// Every node, pre-order, trees in root order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Total node count across all trees
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Linear lookup; use `DescendantIndex` for repeated queries
    pub fn find(&self, identity: &str) -> Option<&HierarchyNode> {
        self.iter().find(|node| node.identity.as_str() == identity)
    }
}

/// Output of one build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildResult {
    pub forest: Forest,
    pub anomalies: Vec<Anomaly>,
}

/// Why a record ended up without a parent
enum ManagerLink {
    Parent(usize),
    Root,
}

/// Builds forests from roster snapshots
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    config: HierarchyConfig,
}

impl HierarchyBuilder {
    pub fn new(config: HierarchyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    pub fn build(&self, records: &[EmployeeRecord]) -> BuildResult {
        let mut log = AnomalyLog::default();

        let considered = records
            .iter()
            .filter(|record| self.config.include_inactive || record.is_active());
        let roster = IdentityResolver::new(self.config.name_match).resolve(considered);
        log.extend(roster.anomalies().iter().cloned().map(Anomaly::from));

        let n = roster.len();
        let mut parent: Vec<Option<usize>> = Vec::with_capacity(n);
        for position in 0..n {
            let link = resolve_manager(&roster, position, &mut log);
            parent.push(match link {
                ManagerLink::Parent(p) => Some(p),
                ManagerLink::Root => None,
            });
        }

        break_cycles(&roster, &mut parent, &mut log);

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots = Vec::new();
        for (position, link) in parent.iter().enumerate() {
            match link {
                Some(p) => children[*p].push(position),
                None => roots.push(position),
            }
        }

        let forest = assemble(roster, &parent, &children, &roots);
        let anomalies = log.into_vec();
        info!(
            records = records.len(),
            nodes = n,
            roots = forest.roots().len(),
            anomalies = anomalies.len(),
            "hierarchy built"
        );

        BuildResult { forest, anomalies }
    }
}

/// Build with default settings (active records only, exact name match)
pub fn build(records: &[EmployeeRecord]) -> BuildResult {
    HierarchyBuilder::default().build(records)
}

fn resolve_manager(roster: &ResolvedRoster, position: usize, log: &mut AnomalyLog) -> ManagerLink {
    let (identity, record) = &roster.entries()[position];
    let manager_name = record.manager_name_trimmed();
    let manager_id = record.manager_id_trimmed();

    if manager_name.is_none() && manager_id.is_none() {
        log.record(Anomaly::new(
            AnomalyKind::NoManager,
            identity.clone(),
            "no manager reference",
        ));
        return ManagerLink::Root;
    }

    let name_match = roster.name_match();
    let self_by_name = manager_name
        .map(|name| name_match.key(name) == name_match.key(&record.name))
        .unwrap_or(false);
    let self_by_id =
        manager_name.is_none() && manager_id.is_some() && manager_id == record.id_trimmed();
    if self_by_name || self_by_id {
        log.record(Anomaly::new(
            AnomalyKind::SelfReference,
            identity.clone(),
            "employee is recorded as their own manager",
        ));
        return ManagerLink::Root;
    }

    let by_id = manager_id.and_then(|id| roster.position_by_id(id));
    let candidates = manager_name
        .map(|name| roster.positions_by_name(name))
        .unwrap_or(&[]);

    let target = match candidates {
        [] => {
            let fallback = by_id.filter(|p| *p != position);
            if fallback.is_some() {
                debug!(identity = %identity, "manager resolved through managerId fallback");
            }
            fallback
        }
        [only] => Some(*only),
        several => {
            let chosen = by_id
                .filter(|p| several.contains(p))
                .unwrap_or(several[0]);
            let involved = several
                .iter()
                .map(|p| roster.entries()[*p].0.clone())
                .collect();
            log.record(
                Anomaly::new(
                    AnomalyKind::AmbiguousManager,
                    identity.clone(),
                    format!(
                        "manager name {:?} matches {} employees; linked to {}",
                        manager_name.unwrap_or_default(),
                        several.len(),
                        roster.entries()[chosen].0
                    ),
                )
                .with_involved(involved),
            );
            Some(chosen)
        }
    };

    let Some(target) = target else {
        let reference = match (manager_name, manager_id) {
            (Some(name), Some(id)) => format!("{:?} / id {:?}", name, id),
            (Some(name), None) => format!("{:?}", name),
            (None, Some(id)) => format!("id {:?}", id),
            (None, None) => String::new(),
        };
        log.record(Anomaly::new(
            AnomalyKind::DanglingManager,
            identity.clone(),
            format!("manager {} is not in the active roster", reference),
        ));
        return ManagerLink::Root;
    };

    if let Some(manager_id) = manager_id.filter(|_| !candidates.is_empty()) {
        let target_record = &roster.entries()[target].1;
        let disagree = match target_record.id_trimmed() {
            Some(target_id) => target_id != manager_id,
            None => by_id.is_some(),
        };
        if disagree {
            log.record(
                Anomaly::new(
                    AnomalyKind::ManagerIdNameMismatch,
                    identity.clone(),
                    format!(
                        "managerName {:?} and managerId {:?} disagree; name wins",
                        manager_name.unwrap_or_default(),
                        manager_id
                    ),
                )
                .with_involved(vec![roster.entries()[target].0.clone()]),
            );
        }
    }

    ManagerLink::Parent(target)
}

const UNVISITED: u8 = 0;
const ON_PATH: u8 = 1;
const DONE: u8 = 2;

/// Walk up from every unvisited record in roster order. Reaching a record
/// already on the current path closes a loop; that record loses its parent.
fn break_cycles(roster: &ResolvedRoster, parent: &mut [Option<usize>], log: &mut AnomalyLog) {
    let mut state = vec![UNVISITED; parent.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent.len() {
        if state[start] != UNVISITED {
            continue;
        }
        path.clear();
        let mut current = Some(start);

        while let Some(node) = current {
            match state[node] {
                DONE => break,
                ON_PATH => {
                    let from = path.iter().position(|p| *p == node).unwrap_or(0);
                    let members: Vec<Identity> = path[from..]
                        .iter()
                        .map(|p| roster.entries()[*p].0.clone())
                        .collect();
                    parent[node] = None;
                    log.record(
                        Anomaly::new(
                            AnomalyKind::Cycle,
                            roster.entries()[node].0.clone(),
                            format!("manager loop of {} broken here", members.len()),
                        )
                        .with_involved(members),
                    );
                    break;
                }
                _ => {
                    state[node] = ON_PATH;
                    path.push(node);
                    current = parent[node];
                }
            }
        }

        for node in &path {
            state[*node] = DONE;
        }
    }
}

/// Materialize owned trees bottom-up so deep chains never recurse.
fn assemble(
    roster: ResolvedRoster,
    parent: &[Option<usize>],
    children: &[Vec<usize>],
    roots: &[usize],
) -> Forest {
    let n = parent.len();
    let mut depth = vec![0usize; n];
    let mut order = Vec::with_capacity(n);
    let mut stack = Vec::new();
    for &root in roots {
        stack.push(root);
        while let Some(node) = stack.pop() {
            order.push(node);
            for &child in children[node].iter().rev() {
                depth[child] = depth[node] + 1;
                stack.push(child);
            }
        }
    }
    debug_assert_eq!(order.len(), n, "every record must be reachable from a root");

    let (entries, _) = roster.into_parts();
    let mut pending: Vec<Option<(Identity, EmployeeRecord)>> =
        entries.into_iter().map(Some).collect();
    let mut built: Vec<Option<HierarchyNode>> = (0..n).map(|_| None).collect();

    for &node in order.iter().rev() {
        let Some((identity, record)) = pending[node].take() else {
            continue;
        };
        let node_children = children[node]
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        built[node] = Some(HierarchyNode {
            identity,
            record,
            children: node_children,
            depth: depth[node],
            is_root: parent[node].is_none(),
        });
    }

    Forest::new(roots.iter().filter_map(|root| built[*root].take()).collect())
}
