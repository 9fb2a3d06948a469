use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{parse_match_date, Match};

/// Language used for schedule labels.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayLocale {
    #[default]
    French,
    English,
}

const FRENCH_MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl DisplayLocale {
    pub fn weekday(&self, day: Weekday) -> &'static str {
        match (self, day) {
            (DisplayLocale::French, Weekday::Mon) => "lundi",
            (DisplayLocale::French, Weekday::Tue) => "mardi",
            (DisplayLocale::French, Weekday::Wed) => "mercredi",
            (DisplayLocale::French, Weekday::Thu) => "jeudi",
            (DisplayLocale::French, Weekday::Fri) => "vendredi",
            (DisplayLocale::French, Weekday::Sat) => "samedi",
            (DisplayLocale::French, Weekday::Sun) => "dimanche",
            (DisplayLocale::English, Weekday::Mon) => "Monday",
            (DisplayLocale::English, Weekday::Tue) => "Tuesday",
            (DisplayLocale::English, Weekday::Wed) => "Wednesday",
            (DisplayLocale::English, Weekday::Thu) => "Thursday",
            (DisplayLocale::English, Weekday::Fri) => "Friday",
            (DisplayLocale::English, Weekday::Sat) => "Saturday",
            (DisplayLocale::English, Weekday::Sun) => "Sunday",
        }
    }

    /// Long date, e.g. `10 janvier 2025` or `January 10, 2025`.
    pub fn long_date(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self {
            DisplayLocale::French => {
                format!("{} {} {}", date.day(), FRENCH_MONTHS[month], date.year())
            }
            DisplayLocale::English => {
                format!("{} {}, {}", ENGLISH_MONTHS[month], date.day(), date.year())
            }
        }
    }
}

/// All matches played on one calendar day.
#[derive(Debug, Clone)]
pub struct MatchDay<'m> {
    /// The raw date string shared by every match in the bucket.
    pub key: &'m str,
    pub date: NaiveDate,
    pub label: String,
    pub weekday: &'static str,
    pub matches: Vec<&'m Match>,
}

/// Matches bucketed by day, days in ascending order.
#[derive(Debug, Clone, Default)]
pub struct Schedule<'m> {
    pub days: Vec<MatchDay<'m>>,
    /// Matches whose date could not be parsed, in input order.
    pub undated: Vec<&'m Match>,
}

impl<'m> Schedule<'m> {
    pub fn len(&self) -> usize {
        self.days.iter().map(|d| d.matches.len()).sum::<usize>() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every match in display order: dated days first, then the undated bucket.
    pub fn iter(&self) -> impl Iterator<Item = &'m Match> + '_ {
        self.days
            .iter()
            .flat_map(|d| d.matches.iter().copied())
            .chain(self.undated.iter().copied())
    }
}

/// A [`MatchDay`] holding its own copies of the matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedMatchDay {
    pub key: String,
    pub date: NaiveDate,
    pub label: String,
    pub weekday: &'static str,
    pub matches: Vec<Match>,
}

/// A [`Schedule`] detached from the records it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnedSchedule {
    pub days: Vec<OwnedMatchDay>,
    pub undated: Vec<Match>,
}

impl Schedule<'_> {
    pub fn into_owned(self) -> OwnedSchedule {
        let days = self
            .days
            .into_iter()
            .map(|day| OwnedMatchDay {
                key: day.key.to_string(),
                date: day.date,
                label: day.label,
                weekday: day.weekday,
                matches: day.matches.into_iter().cloned().collect(),
            })
            .collect();
        OwnedSchedule {
            days,
            undated: self.undated.into_iter().cloned().collect(),
        }
    }
}

/// Group matches by their literal date string and order the groups by date.
///
/// Input order is kept inside each group. Matches whose date is not an exact
/// `YYYY-MM-DD` string end up in [`Schedule::undated`] rather than being
/// dropped, so every day has a distinct date.
pub fn group_by_date<'m, I>(matches: I, locale: DisplayLocale) -> Schedule<'m>
where
    I: IntoIterator<Item = &'m Match>,
{
    let (dated, undated): (Vec<_>, Vec<_>) = matches
        .into_iter()
        .partition(|m| parse_match_date(&m.date).is_some());

    for key in undated.iter().map(|m| m.date.as_str()).unique() {
        warn!(date = key, "match date does not parse, listing as undated");
    }

    let groups = dated
        .into_iter()
        .map(|m| (m.date.as_str(), m))
        .into_group_map();
    let days: Vec<MatchDay<'m>> = groups
        .into_iter()
        .filter_map(|(key, matches)| {
            let date = parse_match_date(key)?;
            Some(MatchDay {
                key,
                date,
                label: locale.long_date(date),
                weekday: locale.weekday(date.weekday()),
                matches,
            })
        })
        .sorted_by_key(|day| day.date)
        .collect();

    debug!(days = days.len(), undated = undated.len(), "grouped schedule");
    Schedule { days, undated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Phase;

    fn on(id: u64, date: &str) -> Match {
        Match {
            id: id.into(),
            home_team: 1u64.into(),
            away_team: 2u64.into(),
            stadium: 1u64.into(),
            date: date.into(),
            time: "20:00".into(),
            phase: Phase::Group,
            group: Some("A".into()),
            home_score: None,
            away_score: None,
            completed: false,
        }
    }

    fn ids(day: &MatchDay<'_>) -> Vec<String> {
        day.matches.iter().map(|m| m.id.to_string()).collect()
    }

    #[test]
    fn buckets_sorted_ascending_with_stable_contents() {
        let matches = vec![
            on(1, "2025-01-12"),
            on(2, "2025-01-10"),
            on(3, "2025-01-10"),
            on(4, "2025-01-11"),
        ];
        let schedule = group_by_date(&matches, DisplayLocale::French);
        let keys: Vec<_> = schedule.days.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec!["2025-01-10", "2025-01-11", "2025-01-12"]);
        assert_eq!(ids(&schedule.days[0]), vec!["2", "3"]);
        assert_eq!(ids(&schedule.days[1]), vec!["4"]);
        assert_eq!(ids(&schedule.days[2]), vec!["1"]);
        assert!(schedule.undated.is_empty());
    }

    #[test]
    fn grouping_is_a_partition() {
        let matches: Vec<_> = ["2025-01-14", "2025-01-13", "2025-01-14", "2025-01-13", "2025-01-15"]
            .iter()
            .enumerate()
            .map(|(i, d)| on(i as u64, d))
            .collect();
        let schedule = group_by_date(&matches, DisplayLocale::French);
        assert_eq!(schedule.len(), matches.len());
        let mut seen: Vec<_> = schedule.iter().map(|m| m.id.to_string()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), matches.len());
        assert!(schedule.days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn french_labels() {
        let matches = vec![on(1, "2025-01-10")];
        let schedule = group_by_date(&matches, DisplayLocale::French);
        assert_eq!(schedule.days[0].label, "10 janvier 2025");
        assert_eq!(schedule.days[0].weekday, "vendredi");
    }

    #[test]
    fn english_labels() {
        let matches = vec![on(1, "2025-08-03")];
        let schedule = group_by_date(&matches, DisplayLocale::English);
        assert_eq!(schedule.days[0].label, "August 3, 2025");
        assert_eq!(schedule.days[0].weekday, "Sunday");
    }

    #[test]
    fn unparsable_dates_go_to_undated_bucket() {
        let matches = vec![on(1, "TBD"), on(2, "2025-01-10"), on(3, "")];
        let schedule = group_by_date(&matches, DisplayLocale::French);
        assert_eq!(schedule.days.len(), 1);
        let undated: Vec<_> = schedule.undated.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(undated, vec!["1", "3"]);
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn loose_spellings_of_a_day_do_not_open_new_buckets() {
        let matches = vec![
            on(1, "2025-01-10"),
            on(2, "2025-1-10"),
            on(3, "2025-01-10 "),
            on(4, "2025-01-09"),
            on(5, "2025-01-10"),
        ];
        let schedule = group_by_date(&matches, DisplayLocale::French);
        let keys: Vec<_> = schedule.days.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec!["2025-01-09", "2025-01-10"]);
        assert!(schedule.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(ids(&schedule.days[1]), vec!["1", "5"]);
        let undated: Vec<_> = schedule.undated.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(undated, vec!["2", "3"]);
    }

    #[test]
    fn owned_schedule_keeps_order() {
        let matches = vec![on(1, "2025-01-11"), on(2, "bad"), on(3, "2025-01-10")];
        let owned = group_by_date(&matches, DisplayLocale::French).into_owned();
        let keys: Vec<_> = owned.days.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-10", "2025-01-11"]);
        assert_eq!(owned.undated, vec![matches[1].clone()]);
    }

    #[test]
    fn groups_filtered_references() {
        let matches = vec![on(1, "2025-01-11"), on(2, "2025-01-10")];
        let picked: Vec<&Match> = matches.iter().collect();
        let schedule = group_by_date(picked.iter().copied(), DisplayLocale::French);
        assert_eq!(schedule.days[0].key, "2025-01-10");
    }
}
