/// Mean earth radius in km
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Km per degree of latitude
const KM_PER_DEGREE: f64 = 111.32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
  pub lat: f64,
  pub lon: f64,
}

impl GeoPoint {
  pub fn new(lat: f64, lon: f64) -> Self {
    Self { lat, lon }
  }
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub west: f64,
  pub south: f64,
  pub east: f64,
  pub north: f64,
}

impl BoundingBox {
  /// `west,south,east,north` as the geocoder expects it.
  pub fn to_param(&self) -> String {
    format!(
      "{:.6},{:.6},{:.6},{:.6}",
      self.west, self.south, self.east, self.north
    )
  }
}

/// Short-term housing near a searched location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
  pub name: String,
  /// OSM value, e.g. "hotel" or "hostel"
  pub kind: String,
  pub address: String,
  pub point: GeoPoint,
  pub distance_km: f64,
}

/// Outcome of a housing lookup. `center` is `None` when the location text
/// did not geocode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HousingResults {
  pub location: String,
  pub center: Option<GeoPoint>,
  pub places: Vec<Place>,
}

/// Great-circle distance in km.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
  let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
  let dlat = (b.lat - a.lat).to_radians();
  let dlon = (b.lon - a.lon).to_radians();

  let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
  2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Box enclosing the circle of `radius_km` around `center`, clamped to valid
/// coordinates.
pub fn bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
  let dlat = radius_km / KM_PER_DEGREE;
  // Near the poles a degree of longitude shrinks to nothing; cap the span
  let cos_lat = center.lat.to_radians().cos().max(0.01);
  let dlon = (radius_km / (KM_PER_DEGREE * cos_lat)).min(180.0);

  BoundingBox {
    west: (center.lon - dlon).max(-180.0),
    south: (center.lat - dlat).max(-90.0),
    east: (center.lon + dlon).min(180.0),
    north: (center.lat + dlat).min(90.0),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_haversine_known_distance() {
    // Paris to London is about 344 km
    let paris = GeoPoint::new(48.8566, 2.3522);
    let london = GeoPoint::new(51.5074, -0.1278);
    let d = haversine_km(paris, london);
    assert!((d - 344.0).abs() < 2.0, "{}", d);
    assert_eq!(haversine_km(paris, paris), 0.0);
  }

  #[test]
  fn test_bounding_box_contains_radius() {
    let center = GeoPoint::new(40.7128, -74.0060);
    let bbox = bounding_box(center, 5.0);

    assert!(bbox.west < center.lon && center.lon < bbox.east);
    assert!(bbox.south < center.lat && center.lat < bbox.north);

    // Edges sit about one radius away
    let north = GeoPoint::new(bbox.north, center.lon);
    let east = GeoPoint::new(center.lat, bbox.east);
    assert!((haversine_km(center, north) - 5.0).abs() < 0.1);
    assert!((haversine_km(center, east) - 5.0).abs() < 0.1);
  }

  #[test]
  fn test_bounding_box_clamped_near_pole() {
    let bbox = bounding_box(GeoPoint::new(89.99, 179.9), 50.0);
    assert_eq!(bbox.north, 90.0);
    assert_eq!(bbox.east, 180.0);
    assert!(bbox.west >= -180.0);
  }

  #[test]
  fn test_bbox_param_order() {
    let bbox = BoundingBox {
      west: 1.0,
      south: 2.0,
      east: 3.0,
      north: 4.0,
    };
    assert_eq!(bbox.to_param(), "1.000000,2.000000,3.000000,4.000000");
  }
}
