use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Point,
}

/// GeoJSON point. Coordinates are stored as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    kind: PointKind,
    coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: PointKind::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn coordinates(&self) -> [f64; 2] {
        self.coordinates
    }

    pub fn is_valid(&self) -> bool {
        let (lng, lat) = (self.longitude(), self.latitude());
        lng.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lng)
            && (-90.0..=90.0).contains(&lat)
    }
}

pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lng = (b.longitude() - a.longitude()).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * central_angle
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{haversine_meters, GeoPoint};

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint::new(77.10, 28.70);
        let distance = haversine_meters(&p, &p);
        assert!(distance < 1e-6);
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = GeoPoint::new(-0.1278, 51.5074);
        let paris = GeoPoint::new(2.3522, 48.8566);
        let distance = haversine_meters(&london, &paris);
        assert!((distance - 343_500.0).abs() < 5_000.0);
    }

    #[test]
    fn serializes_as_geojson_with_longitude_first() {
        let point = GeoPoint::new(77.10, 28.70);
        let value = serde_json::to_value(point).unwrap();

        assert_eq!(value, json!({ "type": "Point", "coordinates": [77.10, 28.70] }));
        assert_eq!(point.longitude(), 77.10);
        assert_eq!(point.latitude(), 28.70);
    }

    #[test]
    fn out_of_range_points_are_invalid() {
        assert!(GeoPoint::new(180.0, -90.0).is_valid());
        assert!(!GeoPoint::new(28.70, 177.10).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
