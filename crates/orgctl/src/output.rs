//! Output formatting - plain ASCII text with optional color, or JSON.
//!
//! Renderers return strings so the command layer decides where they go.

use orgscope_shared::{
    AgeMix, Anomaly, AnomalyReport, EmployeeRecord, Identity, Level, PresentedNode, ScopeDecision,
    ScopeLabel, SeniorityMix,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Colors on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn name(&self, s: &str) -> String {
        if self.color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn level(&self, level: &Level) -> String {
        let text = if level.to_string().is_empty() {
            "-".to_string()
        } else {
            level.to_string()
        };
        if self.color {
            text.cyan().to_string()
        } else {
            text
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn header(&self, s: &str) -> String {
        if self.color {
            s.bright_blue().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn warn(&self, s: &str) -> String {
        if self.color {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }
}

/// One employee in list output
#[derive(Debug, Serialize)]
pub struct PersonView<'a> {
    pub identity: &'a Identity,
    #[serde(flatten)]
    pub record: &'a EmployeeRecord,
}

impl<'a> PersonView<'a> {
    pub fn new(identity: &'a Identity, record: &'a EmployeeRecord) -> Self {
        Self { identity, record }
    }
}

#[derive(Debug, Serialize)]
pub struct ScopeView<'a> {
    #[serde(flatten)]
    pub decision: &'a ScopeDecision,
    pub visible: usize,
    pub members: Vec<PersonView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ReportsView<'a> {
    pub actor: &'a Identity,
    pub direct: bool,
    pub count: usize,
    pub reports: Vec<PersonView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AnomaliesView<'a> {
    pub report: AnomalyReport,
    pub anomalies: &'a [Anomaly],
}

#[derive(Debug, Serialize)]
pub struct MixView<'a> {
    #[serde(flatten)]
    pub decision: &'a ScopeDecision,
    pub mix: &'a SeniorityMix,
}

#[derive(Debug, Serialize)]
pub struct AgeMixView<'a> {
    #[serde(flatten)]
    pub decision: &'a ScopeDecision,
    pub mix: &'a AgeMix,
}

/// Pretty JSON for any view
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn person_line(
    p: Palette,
    identity: &Identity,
    name: &str,
    level: &Level,
    designation: Option<&str>,
) -> String {
    let mut line = format!("{} [{}]", p.name(name), p.level(level));
    if let Some(designation) = designation {
        line.push(' ');
        line.push_str(designation);
    }
    if identity.as_str() != name.trim() {
        line.push(' ');
        line.push_str(&p.dim(&format!("({})", identity)));
    }
    line
}

fn node_line(p: Palette, node: &PresentedNode) -> String {
    let mut line = person_line(
        p,
        &node.identity,
        &node.name,
        &node.level,
        node.designation.as_deref(),
    );
    if node.direct_reports > 0 {
        line.push_str(&p.dim(&format!(" - {} direct", node.direct_reports)));
    }
    line
}

type Pending<'a> = (&'a PresentedNode, String, bool);

fn push_children<'a>(stack: &mut Vec<Pending<'a>>, node: &'a PresentedNode, prefix: &str) {
    let count = node.children.len();
    stack.extend(
        node.children
            .iter()
            .enumerate()
            .rev()
            .map(|(i, child)| (child, prefix.to_string(), i + 1 == count)),
    );
}

fn render_children(p: Palette, node: &PresentedNode, lines: &mut Vec<String>) {
    let mut stack = Vec::new();
    push_children(&mut stack, node, "");
    while let Some((child, prefix, last)) = stack.pop() {
        let connector = if last { "`-- " } else { "|-- " };
        lines.push(format!("{}{}{}", prefix, connector, node_line(p, child)));
        let next = format!("{}{}", prefix, if last { "    " } else { "|   " });
        push_children(&mut stack, child, &next);
    }
}

/// Nested tree, one line per employee
pub fn render_tree(p: Palette, roots: &[PresentedNode]) -> String {
    if roots.is_empty() {
        return p.dim("(no employees)");
    }
    let mut lines = Vec::new();
    for root in roots {
        lines.push(node_line(p, root));
        render_children(p, root, &mut lines);
    }
    lines.join("\n")
}

/// Level groups, senior first
pub fn render_leveled(p: Palette, groups: &BTreeMap<Level, Vec<PresentedNode>>) -> String {
    if groups.is_empty() {
        return p.dim("(no employees)");
    }
    let mut lines = Vec::new();
    for (level, nodes) in groups.iter().rev() {
        lines.push(p.header(&format!("[{}] {}", p.level(level), nodes.len())));
        for node in nodes {
            lines.push(format!("  {}", node_line(p, node)));
        }
    }
    lines.join("\n")
}

/// Flat list of employees
pub fn render_people(p: Palette, people: &[PersonView<'_>]) -> String {
    if people.is_empty() {
        return p.dim("(nobody)");
    }
    people
        .iter()
        .map(|person| {
            let record = person.record;
            let mut line = format!(
                "  {}",
                person_line(
                    p,
                    person.identity,
                    &record.name,
                    &record.level,
                    record.designation.as_deref(),
                )
            );
            if !record.department.trim().is_empty() {
                line.push_str(&p.dim(&format!(" - {}", record.department.trim())));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn scope_heading(p: Palette, decision: &ScopeDecision) -> String {
    let mut heading = format!(
        "Scope: {} (role {}",
        p.header(&decision.label.to_string()),
        decision.role
    );
    if let Some(actor) = &decision.actor {
        heading.push_str(&format!(", actor {}", actor));
    }
    heading.push(')');
    heading
}

pub fn render_scope(p: Palette, view: &ScopeView<'_>) -> String {
    let mut lines = vec![scope_heading(p, view.decision)];
    if view.decision.label == ScopeLabel::None {
        lines.push(p.warn("No access: actor not found in the hierarchy"));
        return lines.join("\n");
    }
    lines.push(format!("{} visible", view.visible));
    lines.push(render_people(p, &view.members));
    lines.join("\n")
}

pub fn render_reports(p: Palette, view: &ReportsView<'_>) -> String {
    let kind = if view.direct { "direct" } else { "total" };
    let lines = vec![
        format!("{} reports under {}: {}", kind, p.name(view.actor.as_str()), view.count),
        render_people(p, &view.reports),
    ];
    lines.join("\n")
}

pub fn render_anomalies(p: Palette, view: &AnomaliesView<'_>) -> String {
    if view.report.total == 0 {
        return "No anomalies".to_string();
    }
    let mut lines = vec![p.header(&format!(
        "{} anomalies ({} warnings)",
        view.report.total, view.report.warnings
    ))];
    for (kind, count) in &view.report.by_kind {
        lines.push(format!("  {:<26} {}", kind.to_string(), count));
    }
    lines.push(String::new());
    for anomaly in view.anomalies {
        let line = anomaly.format();
        lines.push(if anomaly.kind.is_warning() {
            p.warn(&line)
        } else {
            line
        });
    }
    lines.join("\n")
}

pub fn render_mix(p: Palette, view: &MixView<'_>) -> String {
    let mix = view.mix;
    let mut lines = vec![
        scope_heading(p, view.decision),
        format!("{} leveled, {} without level", mix.total, mix.unleveled),
    ];
    for entry in &mix.levels {
        lines.push(format!(
            "  {:<12} {:>5} {:>7.2}%",
            entry.level.to_string(),
            entry.count,
            mix.share(&entry.level)
        ));
    }
    lines.join("\n")
}

pub fn render_age_mix(p: Palette, view: &AgeMixView<'_>) -> String {
    let mix = view.mix;
    let mut lines = vec![
        scope_heading(p, view.decision),
        format!("{} with age band, {} without", mix.total, mix.unbanded),
    ];
    for group in &mix.groups {
        lines.push(format!("  {:<12} {:>5}", group.age_group, group.count));
    }
    lines.join("\n")
}
