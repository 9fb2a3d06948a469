use std::collections::HashMap;

use tracing::debug;

use crate::model::{Match, NearStadium, RecordId, Resource};

/// Foreign-key index over a slice of records.
#[derive(Debug)]
pub struct RecordIndex<'a, T> {
    by_id: HashMap<&'a str, &'a T>,
}

impl<'a, T: Resource> RecordIndex<'a, T> {
    pub fn new(records: &'a [T]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.id().as_str();
            if by_id.contains_key(id) {
                debug!(collection = T::COLLECTION, id, "duplicate id, keeping first");
                continue;
            }
            by_id.insert(id, record);
        }
        Self { by_id }
    }
}

impl<'a, T> RecordIndex<'a, T> {
    pub fn get(&self, id: &RecordId) -> Option<&'a T> {
        self.by_id.get(id.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

pub fn matches_for_team<'m>(matches: &'m [Match], team: &RecordId) -> Vec<&'m Match> {
    matches.iter().filter(|m| m.involves(team)).collect()
}

pub fn matches_at_stadium<'m>(matches: &'m [Match], stadium: &RecordId) -> Vec<&'m Match> {
    matches.iter().filter(|m| &m.stadium == stadium).collect()
}

/// Hotels, restaurants or anything else attached to `stadium`.
pub fn venues_near<'v, V: NearStadium>(venues: &'v [V], stadium: &RecordId) -> Vec<&'v V> {
    venues.iter().filter(|v| v.stadium_id() == stadium).collect()
}

/// Results summary for one team, from completed matches with both scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    pub fn for_team(matches: &[Match], team: &RecordId) -> Self {
        matches
            .iter()
            .filter(|m| m.involves(team))
            .filter_map(|m| {
                let (home, away) = m.final_score()?;
                if &m.home_team == team {
                    Some((home, away))
                } else {
                    Some((away, home))
                }
            })
            .fold(Self::default(), |mut acc, (scored, conceded)| {
                acc.played += 1;
                acc.goals_for += u32::from(scored);
                acc.goals_against += u32::from(conceded);
                match scored.cmp(&conceded) {
                    std::cmp::Ordering::Greater => acc.wins += 1,
                    std::cmp::Ordering::Equal => acc.draws += 1,
                    std::cmp::Ordering::Less => acc.losses += 1,
                }
                acc
            })
    }

    /// Three points for a win, one for a draw.
    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}
