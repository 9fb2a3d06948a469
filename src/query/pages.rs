use serde::{Deserialize, Serialize};

use super::{filter_records, selector, Criterion, Filtered, RecordIndex, TextQuery};
use crate::model::{Match, Phase, Stadium, Team};

/// Filter bar of the matches page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    /// Searched against both team names and the stadium name and city.
    pub query: String,
    pub phase: String,
    #[serde(alias = "groupe")]
    pub group: String,
    pub stadium: String,
}

impl MatchFilter {
    pub fn criteria<'a>(
        &'a self,
        teams: &'a RecordIndex<'a, Team>,
        stadiums: &'a RecordIndex<'a, Stadium>,
    ) -> Vec<Criterion<'a, Match>> {
        [
            Criterion::text("query", &self.query, move |m: &Match, q: &TextQuery| {
                let home = teams.get(&m.home_team);
                let away = teams.get(&m.away_team);
                let stadium = stadiums.get(&m.stadium);
                q.matches_any([
                    home.map(|t| t.name.as_str()),
                    away.map(|t| t.name.as_str()),
                    stadium.map(|s| s.name.as_str()),
                    stadium.map(|s| s.city.as_str()),
                ])
            }),
            phase_criterion(&self.phase),
            Criterion::exact("group", &self.group, |m: &Match| m.group.as_deref()),
            Criterion::exact("stadium", &self.stadium, |m: &Match| Some(m.stadium.as_str())),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn apply<'r>(
        &self,
        matches: &'r [Match],
        teams: &[Team],
        stadiums: &[Stadium],
    ) -> Filtered<'r, Match> {
        let teams = RecordIndex::new(teams);
        let stadiums = RecordIndex::new(stadiums);
        let criteria = self.criteria(&teams, &stadiums);
        filter_records(matches, &criteria)
    }

    pub fn is_active(&self) -> bool {
        [&self.query, &self.phase, &self.group, &self.stadium]
            .into_iter()
            .any(|v| is_active_value(v))
    }

    /// Clear every field. Backs the "reset filters" action of the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Filter bar of the teams page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFilter {
    /// Searched against the team name and the coach.
    pub query: String,
    #[serde(alias = "groupe")]
    pub group: String,
    pub confederation: String,
}

impl TeamFilter {
    pub fn criteria(&self) -> Vec<Criterion<'static, Team>> {
        [
            Criterion::text("query", &self.query, |t: &Team, q: &TextQuery| {
                q.matches_any([Some(t.name.as_str()), t.coach.as_deref()])
            }),
            Criterion::exact("group", &self.group, |t: &Team| t.group.as_deref()),
            Criterion::exact("confederation", &self.confederation, |t: &Team| {
                Some(t.confederation.as_str())
            }),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn apply<'r>(&self, teams: &'r [Team]) -> Filtered<'r, Team> {
        filter_records(teams, &self.criteria())
    }

    pub fn is_active(&self) -> bool {
        [&self.query, &self.group, &self.confederation]
            .into_iter()
            .any(|v| is_active_value(v))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Filter bar of the stadiums page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StadiumFilter {
    /// Searched against the stadium name and city.
    pub query: String,
    #[serde(alias = "ville")]
    pub city: String,
}

impl StadiumFilter {
    pub fn criteria(&self) -> Vec<Criterion<'static, Stadium>> {
        [
            Criterion::text("query", &self.query, |s: &Stadium, q: &TextQuery| {
                q.matches_any([Some(s.name.as_str()), Some(s.city.as_str())])
            }),
            Criterion::exact("city", &self.city, |s: &Stadium| Some(s.city.as_str())),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn apply<'r>(&self, stadiums: &'r [Stadium]) -> Filtered<'r, Stadium> {
        filter_records(stadiums, &self.criteria())
    }

    pub fn is_active(&self) -> bool {
        is_active_value(&self.query) || is_active_value(&self.city)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Phase selector, accepting any label [`Phase`] itself decodes. A label
/// naming no stage matches nothing.
fn phase_criterion<'a>(raw: &str) -> Option<Criterion<'a, Match>> {
    let wanted = Phase::parse_label(selector(raw)?);
    Some(Criterion::new("phase", move |m: &Match| {
        wanted.is_some_and(|phase| m.phase == phase)
    }))
}

fn is_active_value(raw: &str) -> bool {
    selector(raw).is_some()
}
