mod common;
mod matches;
mod stadium;
mod team;
mod venue;

pub use common::*;
pub use matches::*;
pub use stadium::*;
pub use team::*;
pub use venue::*;

pub(crate) use matches::parse_match_date;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type served by one REST collection.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Collection path segment, e.g. `"stades"`.
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;
}
