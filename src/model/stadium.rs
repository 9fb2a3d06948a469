use serde::{Deserialize, Serialize};

use super::common::{Coordinate, RecordId};
use super::Resource;

/// A tournament venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub id: RecordId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(alias = "ville")]
    pub city: String,
    #[serde(alias = "capacite")]
    pub capacity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub location: Coordinate,
    #[serde(default, alias = "annee_construction", alias = "anneeConstruction")]
    pub construction_year: Option<u16>,
}

impl Resource for Stadium {
    const COLLECTION: &'static str = "stades";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
