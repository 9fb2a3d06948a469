use serde::{Deserialize, Serialize};

use super::common::RecordId;
use super::Resource;

/// A hotel listed near a stadium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: RecordId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "etoiles")]
    pub stars: Option<u8>,
    /// Free-form distance label such as "1.2 km".
    #[serde(default)]
    pub distance: String,
    #[serde(alias = "stade", alias = "stade_id")]
    pub stadium: RecordId,
    #[serde(default)]
    pub image: String,
}

impl Resource for Hotel {
    const COLLECTION: &'static str = "hotels";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A restaurant listed near a stadium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RecordId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default, alias = "prix", alias = "gamme_prix")]
    pub price_range: String,
    #[serde(default)]
    pub distance: String,
    #[serde(alias = "stade", alias = "stade_id")]
    pub stadium: RecordId,
    #[serde(default)]
    pub image: String,
}

impl Resource for Restaurant {
    const COLLECTION: &'static str = "restaurants";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Anything attached to a stadium by foreign key.
pub trait NearStadium {
    fn stadium_id(&self) -> &RecordId;
    fn display_name(&self) -> &str;
}

impl NearStadium for Hotel {
    fn stadium_id(&self) -> &RecordId {
        &self.stadium
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl NearStadium for Restaurant {
    fn stadium_id(&self) -> &RecordId {
        &self.stadium
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
