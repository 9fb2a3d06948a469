use std::f64::consts::TAU;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::model::{Coordinate, Hotel, NearStadium, RecordId, Resource, Restaurant, Stadium};
use crate::query::RecordIndex;

/// Default jitter radius for venue markers, in degrees.
pub const DEFAULT_MARKER_RADIUS: f64 = 0.01;

/// Pick a random point within `max_distance` degrees of `origin`.
///
/// Angle and distance are both drawn uniformly, and the offset is applied on a
/// flat plane. This is decorative placement only: there is no geodesic
/// correction and the result is not repeatable.
pub fn sample_nearby<R: Rng + ?Sized>(
    rng: &mut R,
    origin: Coordinate,
    max_distance: f64,
) -> Coordinate {
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return origin;
    }
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(0.0..max_distance);
    Coordinate {
        latitude: origin.latitude + distance * angle.sin(),
        longitude: origin.longitude + distance * angle.cos(),
    }
}

/// [`sample_nearby`] with the thread-local RNG.
pub fn nearby_point(origin: Coordinate, max_distance: f64) -> Coordinate {
    sample_nearby(&mut rand::thread_rng(), origin, max_distance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerKind {
    Stadium,
    Hotel,
    Restaurant,
}

/// A point on the map overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub id: RecordId,
    pub label: String,
    pub position: Coordinate,
    /// The stadium this marker belongs to (its own id for stadium markers).
    pub stadium: RecordId,
}

/// Build the map overlay: one exact marker per stadium, plus a jittered
/// marker per hotel and restaurant around its stadium. Venues whose stadium
/// is unknown are left off the map.
pub fn place_markers<R: Rng + ?Sized>(
    rng: &mut R,
    stadiums: &[Stadium],
    hotels: &[Hotel],
    restaurants: &[Restaurant],
    radius: f64,
) -> Vec<Marker> {
    let index = RecordIndex::new(stadiums);
    let mut markers: Vec<Marker> = stadiums
        .iter()
        .map(|s| Marker {
            kind: MarkerKind::Stadium,
            id: s.id.clone(),
            label: s.name.clone(),
            position: s.location,
            stadium: s.id.clone(),
        })
        .collect();

    let before = markers.len();
    markers.extend(venue_markers(&mut *rng, &index, hotels, MarkerKind::Hotel, radius));
    markers.extend(venue_markers(&mut *rng, &index, restaurants, MarkerKind::Restaurant, radius));
    debug!(
        stadiums = before,
        venues = markers.len() - before,
        "placed map markers"
    );
    markers
}

fn venue_markers<R, V>(
    rng: &mut R,
    stadiums: &RecordIndex<'_, Stadium>,
    venues: &[V],
    kind: MarkerKind,
    radius: f64,
) -> Vec<Marker>
where
    R: Rng + ?Sized,
    V: NearStadium + Resource,
{
    venues
        .iter()
        .filter_map(|venue| {
            let stadium = stadiums.get(venue.stadium_id())?;
            Some(Marker {
                kind,
                id: venue.id().clone(),
                label: venue.display_name().to_string(),
                position: sample_nearby(&mut *rng, stadium.location, radius),
                stadium: stadium.id.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn samples_stay_inside_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let origin = Coordinate::new(0.0, 0.0);
        let d = 0.05;
        for _ in 0..10_000 {
            let p = sample_nearby(&mut rng, origin, d);
            assert!(p.planar_distance(&origin) < d);
        }
    }

    #[test]
    fn angles_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let origin = Coordinate::new(33.5, -7.6);
        let mut sectors = [0usize; 8];
        for _ in 0..10_000 {
            let p = sample_nearby(&mut rng, origin, 1.0);
            let angle = (p.latitude - origin.latitude)
                .atan2(p.longitude - origin.longitude)
                .rem_euclid(TAU);
            let sector = ((angle / TAU) * 8.0) as usize;
            sectors[sector.min(7)] += 1;
        }
        // 1250 expected per sector
        for count in sectors {
            assert!((1_000..1_500).contains(&count), "sector count {count}");
        }
    }

    #[test]
    fn repeated_calls_differ() {
        let origin = Coordinate::new(34.0, -6.8);
        let a = nearby_point(origin, 0.01);
        let b = nearby_point(origin, 0.01);
        assert_ne!(a, b);
    }

    #[test]
    fn degenerate_radius_returns_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let origin = Coordinate::new(30.4, -9.6);
        assert_eq!(sample_nearby(&mut rng, origin, 0.0), origin);
        assert_eq!(sample_nearby(&mut rng, origin, -1.0), origin);
        assert_eq!(sample_nearby(&mut rng, origin, f64::NAN), origin);
    }

    #[test]
    fn markers_skip_unresolved_stadiums() {
        let stadiums: Vec<Stadium> = serde_json::from_str(
            r#"[{"id": 1, "name": "Stade Adrar", "city": "Agadir", "capacity": 45480,
                 "latitude": 30.43, "longitude": -9.54}]"#,
        )
        .unwrap();
        let hotels: Vec<Hotel> = serde_json::from_str(
            r#"[{"id": 10, "name": "Riad", "stadium": 1},
                {"id": 11, "name": "Lost", "stadium": 99}]"#,
        )
        .unwrap();
        let restaurants: Vec<Restaurant> =
            serde_json::from_str(r#"[{"id": 20, "name": "Tajine", "stade": "1"}]"#).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let markers = place_markers(&mut rng, &stadiums, &hotels, &restaurants, DEFAULT_MARKER_RADIUS);
        let kinds: Vec<_> = markers.iter().map(|m| (m.kind, m.id.to_string())).collect();
        assert_eq!(
            kinds,
            vec![
                (MarkerKind::Stadium, "1".to_string()),
                (MarkerKind::Hotel, "10".to_string()),
                (MarkerKind::Restaurant, "20".to_string()),
            ]
        );
        let origin = stadiums[0].location;
        assert!(markers[1].position.planar_distance(&origin) < DEFAULT_MARKER_RADIUS);
    }
}
