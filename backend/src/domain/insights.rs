//! Admin-facing aggregates over investors, startups, selections and rounds.
//!
//! Everything here is pure: the insights service loads snapshots through the
//! driven ports and hands them to [`Dashboard::compute`] and
//! [`InvestorMatches::compute`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Profile, ProfileId, Round, Selection, Startup, StartupId};

/// Number of entries in each ranking.
pub const TOP_LIMIT: usize = 5;
/// Number of entries in the recent activity feed.
pub const ACTIVITY_LIMIT: usize = 8;
const RECENT_SELECTIONS_SCANNED: usize = 20;
const RECENT_ROUNDS_SCANNED: usize = 5;

/// Point-in-time snapshot the dashboard is computed from.
#[derive(Debug, Clone, Default)]
pub struct InsightsSnapshot {
    pub investors: Vec<Profile>,
    pub startups: Vec<Startup>,
    pub selections: Vec<Selection>,
    pub rounds: Vec<Round>,
}

/// A startup ranked by how many investors selected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartupRanking {
    pub startup_id: StartupId,
    pub name: String,
    pub sector: String,
    pub selections: u64,
}

/// A sector ranked by how many startups belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SectorCount {
    pub sector: String,
    pub count: u64,
}

/// Kind of entry in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Selection,
    RoundLive,
    RoundCompleted,
}

/// One line of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub kind: ActivityKind,
    pub message: String,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_investors: u64,
    pub total_startups: u64,
    pub total_selections: u64,
    pub active_rounds: u64,
    pub completed_rounds: u64,
    /// Rounded to one decimal; zero when there are no investors.
    pub avg_selections_per_investor: f64,
    pub top_startups: Vec<StartupRanking>,
    pub top_sectors: Vec<SectorCount>,
    pub recent_activity: Vec<Activity>,
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn handle_of(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

impl Dashboard {
    /// Aggregate a snapshot into dashboard figures.
    pub fn compute(snapshot: &InsightsSnapshot) -> Self {
        let startups: HashMap<StartupId, &Startup> =
            snapshot.startups.iter().map(|s| (s.id, s)).collect();
        let investors: HashMap<ProfileId, &Profile> =
            snapshot.investors.iter().map(|p| (p.id, p)).collect();
        let top_selections: Vec<&Selection> = snapshot
            .selections
            .iter()
            .filter(|s| s.is_top_selected)
            .collect();

        let total_investors = count(snapshot.investors.len());
        let total_selections = count(top_selections.len());
        let active_rounds = count(snapshot.rounds.iter().filter(|r| r.is_active).count());
        let completed_rounds = count(snapshot.rounds.len()) - active_rounds;
        let avg_selections_per_investor = if total_investors == 0 {
            0.0
        } else {
            one_decimal(total_selections as f64 / total_investors as f64)
        };

        Self {
            total_investors,
            total_startups: count(snapshot.startups.len()),
            total_selections,
            active_rounds,
            completed_rounds,
            avg_selections_per_investor,
            top_startups: top_startups(&top_selections, &startups),
            top_sectors: top_sectors(&snapshot.startups),
            recent_activity: recent_activity(snapshot, &top_selections, &startups, &investors),
        }
    }
}

fn top_startups(
    selections: &[&Selection],
    startups: &HashMap<StartupId, &Startup>,
) -> Vec<StartupRanking> {
    let mut counts: HashMap<StartupId, u64> = HashMap::new();
    for selection in selections {
        *counts.entry(selection.startup_id).or_default() += 1;
    }
    let mut ranked: Vec<StartupRanking> = counts
        .into_iter()
        .filter_map(|(id, selections)| {
            startups.get(&id).map(|startup| StartupRanking {
                startup_id: id,
                name: startup.name.clone(),
                sector: startup.sector.clone(),
                selections,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.selections.cmp(&a.selections).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

fn top_sectors(startups: &[Startup]) -> Vec<SectorCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for startup in startups {
        let sector = if startup.sector.trim().is_empty() {
            "Other"
        } else {
            startup.sector.as_str()
        };
        *counts.entry(sector).or_default() += 1;
    }
    let mut ranked: Vec<SectorCount> = counts
        .into_iter()
        .map(|(sector, count)| SectorCount {
            sector: sector.to_owned(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sector.cmp(&b.sector)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

fn recent_activity(
    snapshot: &InsightsSnapshot,
    selections: &[&Selection],
    startups: &HashMap<StartupId, &Startup>,
    investors: &HashMap<ProfileId, &Profile>,
) -> Vec<Activity> {
    let mut recent_selections = selections.to_vec();
    recent_selections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_selections.truncate(RECENT_SELECTIONS_SCANNED);

    let mut feed: Vec<Activity> = recent_selections
        .into_iter()
        .filter_map(|selection| {
            let startup = startups.get(&selection.startup_id)?;
            let investor = investors.get(&selection.investor_id)?;
            Some(Activity {
                kind: ActivityKind::Selection,
                message: format!(
                    "{} selected {}",
                    handle_of(investor.email.as_str()),
                    startup.name
                ),
                detail: Some(startup.sector.clone()),
                timestamp: selection.created_at,
            })
        })
        .collect();

    let mut recent_rounds: Vec<&Round> = snapshot.rounds.iter().collect();
    recent_rounds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_rounds.truncate(RECENT_ROUNDS_SCANNED);
    feed.extend(recent_rounds.into_iter().map(|round| {
        if round.is_active {
            Activity {
                kind: ActivityKind::RoundLive,
                message: format!("Round {} live", round.current_round_number),
                detail: None,
                timestamp: round.created_at,
            }
        } else {
            Activity {
                kind: ActivityKind::RoundCompleted,
                message: format!("Round {} completed", round.current_round_number),
                detail: None,
                timestamp: round.updated_at,
            }
        }
    }));

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(ACTIVITY_LIMIT);
    feed
}

/// One investor and the startups they selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestorMatches {
    pub investor: Profile,
    pub startups: Vec<Startup>,
}

impl InvestorMatches {
    /// Group top selections by investor, newest investors first.
    pub fn compute(snapshot: &InsightsSnapshot) -> Vec<Self> {
        let startups: HashMap<StartupId, &Startup> =
            snapshot.startups.iter().map(|s| (s.id, s)).collect();
        let mut investors = snapshot.investors.clone();
        investors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        investors
            .into_iter()
            .map(|investor| {
                let picked = snapshot
                    .selections
                    .iter()
                    .filter(|s| s.is_top_selected && s.investor_id == investor.id)
                    .filter_map(|s| startups.get(&s.startup_id).map(|st| (*st).clone()))
                    .collect();
                Self {
                    investor,
                    startups: picked,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod tests;
