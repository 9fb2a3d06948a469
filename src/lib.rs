//! Client-side data layer for a football tournament guide.
//!
//! Fetches teams, stadiums, matches, hotels and restaurants from the REST
//! backend into per-collection [`RecordStore`]s, and provides the pure
//! functions every page builds on: composable filters ([`query`]), day-by-day
//! schedules ([`schedule`]) and map marker placement ([`geo`]).

pub use client::GuideClient;
pub use config::GuideConfig;
pub use error::{GuideError, Result};
pub use model::*;
pub use query::{
    filter_records, matches_all, Criterion, Filtered, MatchFilter, RecordIndex, StadiumFilter,
    TeamFilter, TextQuery,
};
pub use schedule::{group_by_date, DisplayLocale, MatchDay, OwnedSchedule, Schedule};
pub use storage::{Language, LocalStorage, Preferences, Theme};
pub use store::{LoadGuard, LoadOutcome, RecordStore, Snapshot};
pub use tournament::{RefreshReport, Tournament};

pub(crate) mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod query;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod tournament;
