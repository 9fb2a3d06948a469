use serde::{Deserialize, Serialize};

use super::common::RecordId;
use super::Resource;

/// A national team taking part in the tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: RecordId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default, alias = "drapeau")]
    pub flag: String,
    #[serde(default, alias = "groupe")]
    pub group: Option<String>,
    #[serde(default)]
    pub confederation: String,
    #[serde(default, alias = "classement")]
    pub rank: Option<u32>,
    #[serde(default, alias = "entraineur", alias = "selectionneur")]
    pub coach: Option<String>,
}

impl Resource for Team {
    const COLLECTION: &'static str = "equipes";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_french_payload() {
        let team: Team = serde_json::from_str(
            r#"{"id": 3, "nom": "Maroc", "drapeau": "ma.png", "groupe": "A",
                "confederation": "CAF", "classement": 12, "entraineur": "W. Regragui"}"#,
        )
        .unwrap();
        assert_eq!(team.id.as_str(), "3");
        assert_eq!(team.name, "Maroc");
        assert_eq!(team.group.as_deref(), Some("A"));
        assert_eq!(team.rank, Some(12));
        assert_eq!(team.coach.as_deref(), Some("W. Regragui"));
    }

    #[test]
    fn optional_fields_default() {
        let team: Team = serde_json::from_str(r#"{"id": "t1", "name": "Mali"}"#).unwrap();
        assert!(team.group.is_none());
        assert!(team.coach.is_none());
        assert!(team.flag.is_empty());
    }
}
