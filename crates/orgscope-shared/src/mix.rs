//! Headcount mixes within a scope: per seniority level and per age band.

use crate::descendants::DescendantIndex;
use crate::employee::{EmployeeRecord, Level};
use crate::scope::EmployeeScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: Level,
    pub count: usize,
}

/// Level distribution, junior-first (`l0`..`l9`, then unranked tags)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityMix {
    /// Records with any non-blank level
    pub total: usize,
    /// Records with a blank level; not part of `levels`
    pub unleveled: usize,
    pub levels: Vec<LevelCount>,
}

impl SeniorityMix {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EmployeeRecord>,
    {
        let mut counts: BTreeMap<Level, usize> = BTreeMap::new();
        let mut unleveled = 0;
        for record in records {
            match &record.level {
                Level::Unranked(tag) if tag.trim().is_empty() => unleveled += 1,
                level => *counts.entry(level.clone()).or_insert(0) += 1,
            }
        }

        let (ranked, unranked): (Vec<_>, Vec<_>) =
            counts.into_iter().partition(|(level, _)| level.is_ranked());
        let levels: Vec<LevelCount> = ranked
            .into_iter()
            .chain(unranked)
            .map(|(level, count)| LevelCount { level, count })
            .collect();

        Self {
            total: levels.iter().map(|l| l.count).sum(),
            unleveled,
            levels,
        }
    }

    /// Mix of every indexed record the scope admits
    pub fn for_scope(index: &DescendantIndex, scope: &EmployeeScope) -> Self {
        Self::from_records(
            index
                .identities()
                .iter()
                .zip(index.records())
                .filter(|(identity, record)| scope.admits(identity, record))
                .map(|(_, record)| record),
        )
    }

    pub fn count(&self, level: &Level) -> usize {
        self.levels
            .iter()
            .find(|l| l.level == *level)
            .map(|l| l.count)
            .unwrap_or(0)
    }

    /// Percentage of `total`, two decimals
    pub fn share(&self, level: &Level) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = self.count(level) as f64 / self.total as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    }
}

/// Age bands in display order. Unknown bands follow, alphabetically.
pub const AGE_BANDS: [&str; 6] = ["20-25", "25-30", "30-35", "35-40", "40-45", "45+"];

fn band_rank(band: &str) -> usize {
    AGE_BANDS
        .iter()
        .position(|b| *b == band)
        .unwrap_or(AGE_BANDS.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCount {
    pub age_group: String,
    pub count: usize,
}

/// Age band distribution, youngest band first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeMix {
    /// Records with an age band
    pub total: usize,
    /// Records without one; not part of `groups`
    pub unbanded: usize,
    pub groups: Vec<AgeCount>,
}

impl AgeMix {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EmployeeRecord>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut unbanded = 0;
        for record in records {
            match record.age_group.as_deref().map(str::trim) {
                Some(band) if !band.is_empty() => *counts.entry(band.to_string()).or_insert(0) += 1,
                _ => unbanded += 1,
            }
        }

        let mut groups: Vec<AgeCount> = counts
            .into_iter()
            .map(|(age_group, count)| AgeCount { age_group, count })
            .collect();
        // stable: unknown bands keep their alphabetical order
        groups.sort_by_key(|g| band_rank(&g.age_group));

        Self {
            total: groups.iter().map(|g| g.count).sum(),
            unbanded,
            groups,
        }
    }

    pub fn for_scope(index: &DescendantIndex, scope: &EmployeeScope) -> Self {
        Self::from_records(
            index
                .identities()
                .iter()
                .zip(index.records())
                .filter(|(identity, record)| scope.admits(identity, record))
                .map(|(_, record)| record),
        )
    }

    pub fn count(&self, age_group: &str) -> usize {
        self.groups
            .iter()
            .find(|g| g.age_group == age_group)
            .map(|g| g.count)
            .unwrap_or(0)
    }
}
