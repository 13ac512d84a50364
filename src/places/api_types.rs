//! GeoJSON shapes returned by the geocoder.

use serde::Deserialize;

use super::types::GeoPoint;

#[derive(Debug, Default, Deserialize)]
pub struct FeatureCollection {
  #[serde(default)]
  pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
  #[serde(default)]
  pub geometry: Option<Geometry>,
  #[serde(default)]
  pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
  #[serde(rename = "type")]
  pub kind: String,
  /// Shape depends on `kind`; only points are used
  #[serde(default)]
  pub coordinates: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct Properties {
  pub name: Option<String>,
  pub osm_value: Option<String>,
  pub housenumber: Option<String>,
  pub street: Option<String>,
  pub city: Option<String>,
  pub postcode: Option<String>,
  pub country: Option<String>,
}

impl Feature {
  /// Point geometry as lat/lon. GeoJSON orders coordinates `[lon, lat]`.
  pub fn point(&self) -> Option<GeoPoint> {
    let geometry = self.geometry.as_ref()?;
    if geometry.kind != "Point" {
      return None;
    }
    let coords = geometry.coordinates.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some(GeoPoint::new(lat, lon))
  }
}

impl Properties {
  /// "12 Main St, Springfield 12345" from whatever parts are present.
  pub fn address(&self) -> String {
    let street = match (&self.housenumber, &self.street) {
      (Some(number), Some(street)) => Some(format!("{} {}", number, street)),
      (None, Some(street)) => Some(street.clone()),
      _ => None,
    };
    let locality = match (&self.city, &self.postcode) {
      (Some(city), Some(postcode)) => Some(format!("{} {}", city, postcode)),
      (Some(city), None) => Some(city.clone()),
      (None, Some(postcode)) => Some(postcode.clone()),
      (None, None) => None,
    };

    [street, locality]
      .into_iter()
      .flatten()
      .collect::<Vec<_>>()
      .join(", ")
  }
}
