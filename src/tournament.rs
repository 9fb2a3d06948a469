use std::sync::Arc;

use rand::Rng;
use tracing::{info, instrument};

use crate::client::GuideClient;
use crate::config::GuideConfig;
use crate::error::Result;
use crate::geo::{self, Marker};
use crate::model::{Hotel, Match, Restaurant, Stadium, Team};
use crate::query::{MatchFilter, StadiumFilter, TeamFilter};
use crate::schedule::{self, DisplayLocale, OwnedSchedule};
use crate::storage::{LocalStorage, Preferences};
use crate::store::{LoadOutcome, RecordStore};

/// Outcome of [`Tournament::refresh_all`], one entry per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub teams: LoadOutcome,
    pub stadiums: LoadOutcome,
    pub matches: LoadOutcome,
    pub hotels: LoadOutcome,
    pub restaurants: LoadOutcome,
}

/// Everything the guide's pages read from: one store per collection, the
/// client that fills them, and the user's stored preferences.
#[derive(Debug)]
pub struct Tournament {
    client: GuideClient,
    storage: LocalStorage,
    locale: DisplayLocale,
    marker_radius: f64,
    pub teams: Arc<RecordStore<Team>>,
    pub stadiums: Arc<RecordStore<Stadium>>,
    pub matches: Arc<RecordStore<Match>>,
    pub hotels: Arc<RecordStore<Hotel>>,
    pub restaurants: Arc<RecordStore<Restaurant>>,
}

impl Tournament {
    /// Build the client and stores from configuration. With a storage path,
    /// fetched lists are cached there and used when the backend is down.
    pub fn from_config(config: &GuideConfig) -> Result<Self> {
        let client = GuideClient::from_config(config)?;
        let storage = match &config.storage_path {
            Some(path) => LocalStorage::open(path)?,
            None => LocalStorage::in_memory(),
        };
        let cached = config.storage_path.is_some().then(|| storage.clone());
        Ok(Self::with_parts(
            client,
            storage,
            cached,
            config.locale,
            config.marker_radius,
        ))
    }

    fn with_parts(
        client: GuideClient,
        storage: LocalStorage,
        fallback: Option<LocalStorage>,
        locale: DisplayLocale,
        marker_radius: f64,
    ) -> Self {
        fn store<T: crate::model::Resource>(fallback: &Option<LocalStorage>) -> Arc<RecordStore<T>> {
            let store = RecordStore::new();
            Arc::new(match fallback {
                Some(storage) => store.with_fallback(storage.clone()),
                None => store,
            })
        }
        Self {
            teams: store(&fallback),
            stadiums: store(&fallback),
            matches: store(&fallback),
            hotels: store(&fallback),
            restaurants: store(&fallback),
            client,
            storage,
            locale,
            marker_radius,
        }
    }

    pub fn client(&self) -> &GuideClient {
        &self.client
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::load(&self.storage)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        preferences.save(&self.storage)
    }

    /// Reload every collection concurrently.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> RefreshReport {
        let (teams, stadiums, matches, hotels, restaurants) = tokio::join!(
            self.teams.load(self.client.get_teams()),
            self.stadiums.load(self.client.get_stadiums()),
            self.matches.load(self.client.get_matches()),
            self.hotels.load(self.client.get_hotels()),
            self.restaurants.load(self.client.get_restaurants()),
        );
        let report = RefreshReport {
            teams,
            stadiums,
            matches,
            hotels,
            restaurants,
        };
        info!(?report, "refreshed tournament data");
        report
    }

    /// Matches passing `filter`, grouped by day and rendered with the
    /// configured locale. Each call works on fresh snapshots.
    pub fn schedule(&self, filter: &MatchFilter) -> OwnedSchedule {
        let (matches, teams, stadiums) = (
            self.matches.snapshot(),
            self.teams.snapshot(),
            self.stadiums.snapshot(),
        );
        let filtered = filter.apply(&matches, &teams, &stadiums);
        schedule::group_by_date(filtered.records.iter().copied(), self.locale).into_owned()
    }

    pub fn search_teams(&self, filter: &TeamFilter) -> Vec<Team> {
        filter.apply(&self.teams.snapshot()).to_vec()
    }

    pub fn search_stadiums(&self, filter: &StadiumFilter) -> Vec<Stadium> {
        filter.apply(&self.stadiums.snapshot()).to_vec()
    }

    /// Current map overlay.
    pub fn markers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Marker> {
        geo::place_markers(
            rng,
            &self.stadiums.snapshot(),
            &self.hotels.snapshot(),
            &self.restaurants.snapshot(),
            self.marker_radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::client::tests::{local_client, serve};
    use crate::storage::{Language, Theme};

    const TEAMS: &str = r#"[{"id": 1, "nom": "Maroc", "groupe": "A"},
                            {"id": 2, "nom": "Mali", "groupe": "A"}]"#;
    const STADIUMS: &str = r#"[{"id": 1, "nom": "Stade Mohammed V", "ville": "Casablanca",
                               "capacite": 45000, "latitude": 33.58, "longitude": -7.64}]"#;
    const MATCHES: &str = r#"[{"id": 1, "equipe1": 1, "equipe2": 2, "stade": 1,
                              "date": "2025-01-11", "heure": "20:00", "phase": "Group", "groupe": "A"},
                             {"id": 2, "equipe1": 2, "equipe2": 1, "stade": "1",
                              "date": "2025-01-10", "heure": "17:00", "phase": "Group", "groupe": "A"}]"#;
    const HOTELS: &str = r#"[{"id": 7, "nom": "Hyatt", "stade": 1}]"#;
    const RESTAURANTS: &str = r#"[]"#;

    fn tournament(base: String, fallback: Option<LocalStorage>) -> Tournament {
        Tournament::with_parts(
            local_client(base),
            LocalStorage::in_memory(),
            fallback,
            DisplayLocale::French,
            0.01,
        )
    }

    #[tokio::test]
    async fn refresh_then_query() {
        let (base, server) = serve(vec![
            ("GET /api/equipes", 200, TEAMS),
            ("GET /api/stades", 200, STADIUMS),
            ("GET /api/matches", 200, MATCHES),
            ("GET /api/hotels", 200, HOTELS),
            ("GET /api/restaurants", 200, RESTAURANTS),
        ])
        .await;
        let tournament = tournament(base, None);
        let report = tournament.refresh_all().await;
        assert_eq!(report.teams, LoadOutcome::Applied(2));
        assert_eq!(report.restaurants, LoadOutcome::Applied(0));
        server.await.unwrap();

        let schedule = tournament.schedule(&MatchFilter {
            query: "casablanca".into(),
            ..Default::default()
        });
        let keys: Vec<_> = schedule.days.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-10", "2025-01-11"]);
        assert_eq!(schedule.days[0].weekday, "vendredi");
        assert_eq!(schedule.days[0].matches[0].id.as_str(), "2");

        let found = tournament.search_teams(&TeamFilter {
            query: "mal".into(),
            ..Default::default()
        });
        assert_eq!(found.len(), 1);

        let markers = tournament.markers(&mut StdRng::seed_from_u64(5));
        assert_eq!(markers.len(), 2);
    }

    #[tokio::test]
    async fn backend_outage_falls_back_to_cached_lists() {
        let cache = LocalStorage::in_memory();
        let cached: Vec<Team> = serde_json::from_str(TEAMS).unwrap();
        cache.set("records.equipes", &cached).unwrap();

        let (base, server) = serve(vec![
            ("GET /api/equipes", 503, "{}"),
            ("GET /api/stades", 503, "{}"),
            ("GET /api/matches", 503, "{}"),
            ("GET /api/hotels", 503, "{}"),
            ("GET /api/restaurants", 503, "{}"),
        ])
        .await;
        let tournament = tournament(base, Some(cache));
        let report = tournament.refresh_all().await;
        server.await.unwrap();

        assert_eq!(report.teams, LoadOutcome::Fallback(2));
        assert_eq!(report.matches, LoadOutcome::Cleared);
        assert_eq!(tournament.teams.snapshot().len(), 2);
        assert!(tournament.schedule(&MatchFilter::default()).days.is_empty());
    }

    #[tokio::test]
    async fn preferences_use_tournament_storage() {
        let tournament = tournament("http://127.0.0.1:9".into(), None);
        assert_eq!(tournament.preferences(), Preferences::default());
        let prefs = Preferences {
            language: Language::En,
            theme: Theme::Dark,
        };
        tournament.save_preferences(&prefs).unwrap();
        assert_eq!(tournament.preferences(), prefs);
    }
}
