//! Command execution.
//!
//! Every command loads config, reads one roster snapshot, builds the org
//! snapshot once and renders the answer as text or JSON.

use crate::cli::{Cli, Commands};
use crate::output::{
    self, AgeMixView, AnomaliesView, MixView, Palette, PersonView, ReportsView, ScopeView,
};
use anyhow::{Context, Result};
use orgscope_shared::identity::identity_of;
use orgscope_shared::roster::{by_level, matches_query, search};
use orgscope_shared::{
    EmployeeRecord, Identity, JsonRoster, Level, OrgConfig, OrgSnapshot, Role, RosterProvider,
};
use tracing::debug;

/// Config plus the roster records it points at
pub struct Loaded {
    pub config: OrgConfig,
    pub records: Vec<EmployeeRecord>,
}

pub fn load(cli: &Cli) -> Result<Loaded> {
    let config = OrgConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let roster_path = cli
        .roster
        .clone()
        .unwrap_or_else(|| config.roster.path.clone());
    debug!(path = %roster_path.display(), "reading roster");
    let records = JsonRoster::new(&roster_path)
        .fetch_roster()
        .with_context(|| format!("Failed to read roster {}", roster_path.display()))?;
    Ok(Loaded { config, records })
}

/// Run the parsed command and return what should be printed
pub fn execute(cli: &Cli, palette: Palette) -> Result<String> {
    let loaded = load(cli)?;
    let snapshot = OrgSnapshot::build(&loaded.records, &loaded.config);

    match &cli.command {
        Commands::Tree { leveled: true, .. } => {
            let groups = snapshot.present_leveled();
            if cli.json {
                // JSON object keys must be strings
                let keyed: Vec<_> = groups.iter().rev().map(|(l, n)| (l.to_string(), n)).collect();
                Ok(output::to_json(&keyed)?)
            } else {
                Ok(output::render_leveled(palette, &groups))
            }
        }
        Commands::Tree {
            root: Some(root), ..
        } => {
            let subtree = snapshot.present_subtree(root)?;
            if cli.json {
                Ok(output::to_json(&subtree)?)
            } else {
                Ok(output::render_tree(palette, std::slice::from_ref(&subtree)))
            }
        }
        Commands::Tree { .. } => {
            let roots = snapshot.present();
            if cli.json {
                Ok(output::to_json(&roots)?)
            } else {
                Ok(output::render_tree(palette, &roots))
            }
        }
        Commands::Scope {
            role,
            actor,
            department,
        } => {
            let role: Role = role.parse()?;
            let decision = snapshot.decide_scope(role, actor.as_deref(), department.as_deref());
            let members: Vec<_> = snapshot
                .scoped_records(&decision.scope)
                .into_iter()
                .map(|(identity, record)| PersonView::new(identity, record))
                .collect();
            let view = ScopeView {
                decision: &decision,
                visible: members.len(),
                members,
            };
            if cli.json {
                Ok(output::to_json(&view)?)
            } else {
                Ok(output::render_scope(palette, &view))
            }
        }
        Commands::Reports { actor, direct } => {
            let identity = snapshot.resolve_actor(actor)?;
            let reports: Vec<_> = if *direct {
                snapshot
                    .direct_reports_of(identity.as_str())
                    .into_iter()
                    .map(|(identity, record)| PersonView::new(identity, record))
                    .collect()
            } else {
                snapshot
                    .index()
                    .descendant_identities_of(identity.as_str())
                    .iter()
                    .zip(snapshot.descendants_of(identity.as_str()))
                    .map(|(identity, record)| PersonView::new(identity, record))
                    .collect()
            };
            let view = ReportsView {
                actor: identity,
                direct: *direct,
                count: reports.len(),
                reports,
            };
            if cli.json {
                Ok(output::to_json(&view)?)
            } else {
                Ok(output::render_reports(palette, &view))
            }
        }
        Commands::Anomalies => {
            let view = AnomaliesView {
                report: snapshot.anomaly_report(),
                anomalies: snapshot.anomalies(),
            };
            if cli.json {
                Ok(output::to_json(&view)?)
            } else {
                Ok(output::render_anomalies(palette, &view))
            }
        }
        Commands::List {
            level,
            search: query,
        } => {
            let records = list_records(&loaded.records, level.as_deref(), query.as_deref());
            let identities: Vec<Identity> = records.iter().map(|r| identity_of(r)).collect();
            let people: Vec<_> = identities
                .iter()
                .zip(records)
                .map(|(identity, record)| PersonView::new(identity, record))
                .collect();
            if cli.json {
                Ok(output::to_json(&people)?)
            } else {
                Ok(output::render_people(palette, &people))
            }
        }
        Commands::Mix {
            role,
            actor,
            department,
            age,
        } => {
            let role: Role = role.parse()?;
            let decision = snapshot.decide_scope(role, actor.as_deref(), department.as_deref());
            if *age {
                let mix = snapshot.age_mix(&decision.scope);
                let view = AgeMixView {
                    decision: &decision,
                    mix: &mix,
                };
                return if cli.json {
                    Ok(output::to_json(&view)?)
                } else {
                    Ok(output::render_age_mix(palette, &view))
                };
            }
            let mix = snapshot.seniority_mix(&decision.scope);
            let view = MixView {
                decision: &decision,
                mix: &mix,
            };
            if cli.json {
                Ok(output::to_json(&view)?)
            } else {
                Ok(output::render_mix(palette, &view))
            }
        }
    }
}

/// Active roster records for `list`, sorted by name
pub fn list_records<'a>(
    records: &'a [EmployeeRecord],
    level: Option<&str>,
    query: Option<&str>,
) -> Vec<&'a EmployeeRecord> {
    let mut matched = match level {
        Some(level) => by_level(records, &Level::parse(level)),
        None => search(records, ""),
    };
    if let Some(query) = query {
        matched.retain(|r| matches_query(r, query));
    }
    matched
}
