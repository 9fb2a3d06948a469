use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::IntoEnumIterator;
use tracing::warn;

use super::common::RecordId;
use super::Resource;

pub(crate) const MATCH_DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const MATCH_TIME_FORMAT: &str = "%H:%M";
pub(crate) const MATCH_TIME_FORMAT_SECS: &str = "%H:%M:%S";

/// A scheduled or played match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: RecordId,
    #[serde(alias = "equipe1", alias = "team1")]
    pub home_team: RecordId,
    #[serde(alias = "equipe2", alias = "team2")]
    pub away_team: RecordId,
    #[serde(alias = "stade", alias = "stade_id")]
    pub stadium: RecordId,
    /// Calendar date exactly as the backend sent it. Used verbatim as the
    /// schedule grouping key.
    pub date: String,
    #[serde(default, alias = "heure")]
    pub time: String,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default, alias = "groupe")]
    pub group: Option<String>,
    #[serde(default, alias = "score1")]
    pub home_score: Option<u8>,
    #[serde(default, alias = "score2")]
    pub away_score: Option<u8>,
    #[serde(default, alias = "termine")]
    pub completed: bool,
}

impl Match {
    /// Parsed calendar date, if the raw string is exactly an ISO `YYYY-MM-DD`
    /// date (zero-padded, no surrounding whitespace).
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_match_date(&self.date)
    }

    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        let date = self.calendar_date()?;
        let time = self.time.trim();
        let time = NaiveTime::parse_from_str(time, MATCH_TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(time, MATCH_TIME_FORMAT_SECS))
            .ok()?;
        Some(date.and_time(time))
    }

    pub fn involves(&self, team: &RecordId) -> bool {
        &self.home_team == team || &self.away_team == team
    }

    /// Final score as `(home, away)` once the match is completed.
    pub fn final_score(&self) -> Option<(u8, u8)> {
        if !self.completed {
            return None;
        }
        Some((self.home_score?, self.away_score?))
    }

    /// A group-stage match must carry its group label.
    pub fn is_consistent(&self) -> bool {
        match self.phase {
            Phase::Group => self.group.as_deref().is_some_and(|g| !g.trim().is_empty()),
            _ => true,
        }
    }
}

impl Resource for Match {
    const COLLECTION: &'static str = "matches";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Strict date parse. Only strings that format back to themselves are
/// accepted, so two keys that parse to the same day are always equal.
pub(crate) fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, MATCH_DATE_FORMAT).ok()?;
    (date.format(MATCH_DATE_FORMAT).to_string() == raw).then_some(date)
}

/// Tournament stage.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Phase {
    #[strum(
        to_string = "group",
        serialize = "groups",
        serialize = "groupes",
        serialize = "phase de groupes",
        serialize = "poules"
    )]
    Group,
    #[strum(
        to_string = "round-of-16",
        serialize = "huitiemes",
        serialize = "huitièmes",
        serialize = "huitiemes de finale",
        serialize = "huitièmes de finale"
    )]
    RoundOf16,
    #[strum(
        to_string = "quarterfinal",
        serialize = "quarter-final",
        serialize = "quarts",
        serialize = "quarts de finale"
    )]
    QuarterFinal,
    #[strum(
        to_string = "semifinal",
        serialize = "semi-final",
        serialize = "demi-finale",
        serialize = "demi-finales"
    )]
    SemiFinal,
    #[strum(
        to_string = "third-place",
        serialize = "petite finale",
        serialize = "troisieme place",
        serialize = "troisième place"
    )]
    ThirdPlace,
    #[strum(to_string = "final", serialize = "finale")]
    Final,
    #[default]
    #[strum(disabled)]
    Unknown,
}

impl Phase {
    /// Every real stage, in tournament order.
    pub fn stages() -> impl Iterator<Item = Phase> {
        Phase::iter().filter(|p| *p != Phase::Unknown)
    }

    /// Look up a stage by any of its English or French labels, ignoring case
    /// and surrounding whitespace.
    pub fn parse_label(label: &str) -> Option<Phase> {
        Phase::from_str(&label.trim().to_lowercase()).ok()
    }

    /// Like [`Phase::parse_label`], but unknown labels become
    /// [`Phase::Unknown`] with a warning.
    pub fn from_label(label: &str) -> Phase {
        Self::parse_label(label).unwrap_or_else(|| {
            warn!(phase = label, "unknown match phase");
            Phase::Unknown
        })
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name: &'static str = self.into();
        serializer.serialize_str(name)
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Phase::from_label(&raw))
    }
}
