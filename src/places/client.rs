use color_eyre::{eyre::eyre, Result};
use url::Url;

use crate::config::PlacesConfig;
use crate::error::FetchError;

use super::api_types::FeatureCollection;
use super::types::{bounding_box, haversine_km, GeoPoint, HousingResults, Place};

/// Free-text term sent with the housing search
const HOUSING_TERM: &str = "accommodation";

/// OSM tags that count as short-term housing
const HOUSING_TAGS: &[&str] = &[
  "tourism:apartment",
  "tourism:guest_house",
  "tourism:hostel",
  "tourism:hotel",
  "tourism:motel",
];

/// Geocoding and nearby housing lookup against a Photon-compatible endpoint.
#[derive(Clone)]
pub struct PlacesClient {
  http: reqwest::Client,
  base_url: Url,
  limit: u32,
  radius_km: f64,
}

impl PlacesClient {
  pub fn new(config: &PlacesConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid places url {}: {}", config.base_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Places url {} cannot be used as a base", base_url));
    }

    let http = reqwest::Client::builder()
      .user_agent(concat!("comfortzone/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      limit: config.limit,
      radius_km: config.radius_km,
    })
  }

  /// Geocode `location`, then list housing within the configured radius.
  pub async fn lookup(&self, location: &str) -> Result<HousingResults, FetchError> {
    let Some(center) = self.geocode(location).await? else {
      return Ok(HousingResults {
        location: location.to_string(),
        ..Default::default()
      });
    };

    let places = self.nearby_housing(center, self.radius_km).await?;
    Ok(HousingResults {
      location: location.to_string(),
      center: Some(center),
      places,
    })
  }

  /// First match for a free-text location.
  pub async fn geocode(&self, text: &str) -> Result<Option<GeoPoint>, FetchError> {
    let mut url = self.endpoint();
    url
      .query_pairs_mut()
      .append_pair("q", text)
      .append_pair("limit", "1");

    let collection = self.get_features(url).await?;
    Ok(collection.features.iter().find_map(|f| f.point()))
  }

  /// Housing within `radius_km` of `center`, nearest first.
  pub async fn nearby_housing(
    &self,
    center: GeoPoint,
    radius_km: f64,
  ) -> Result<Vec<Place>, FetchError> {
    let bbox = bounding_box(center, radius_km);

    let mut url = self.endpoint();
    {
      let mut query = url.query_pairs_mut();
      query
        .append_pair("q", HOUSING_TERM)
        .append_pair("lat", &center.lat.to_string())
        .append_pair("lon", &center.lon.to_string())
        .append_pair("bbox", &bbox.to_param())
        .append_pair("limit", &self.limit.to_string());
      for tag in HOUSING_TAGS {
        query.append_pair("osm_tag", tag);
      }
    }

    let collection = self.get_features(url).await?;
    let mut places: Vec<Place> = collection
      .features
      .into_iter()
      .filter_map(|feature| {
        let point = feature.point()?;
        let distance_km = haversine_km(center, point);
        if distance_km > radius_km {
          return None;
        }
        let props = feature.properties;
        Some(Place {
          name: props.name.clone().unwrap_or_else(|| "Unnamed".to_string()),
          kind: props.osm_value.clone().unwrap_or_default(),
          address: props.address(),
          point,
          distance_km,
        })
      })
      .collect();

    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(places)
  }

  fn endpoint(&self) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().push("api");
    }
    url
  }

  async fn get_features(&self, url: Url) -> Result<FeatureCollection, FetchError> {
    tracing::debug!(path = url.path(), "GET");

    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Network(format!("HTTP {}", status)));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client(server: &MockServer) -> PlacesClient {
    PlacesClient::new(&PlacesConfig {
      base_url: server.uri(),
      ..Default::default()
    })
    .unwrap()
  }

  fn point(name: &str, kind: &str, lon: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [lon, lat]},
      "properties": {"name": name, "osm_value": kind, "city": "Austin"}
    })
  }

  #[tokio::test]
  async fn test_geocode_first_feature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api"))
      .and(query_param("q", "Austin, TX"))
      .and(query_param("limit", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "features": [point("Austin", "city", -97.74, 30.27)]
      })))
      .mount(&server)
      .await;

    let found = client(&server).geocode("Austin, TX").await.unwrap();
    assert_eq!(found, Some(GeoPoint::new(30.27, -97.74)));
  }

  #[tokio::test]
  async fn test_unknown_location_gives_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"features": []})))
      .expect(1)
      .mount(&server)
      .await;

    let results = client(&server).lookup("Atlantis").await.unwrap();
    assert_eq!(results.center, None);
    assert!(results.places.is_empty());
  }

  #[tokio::test]
  async fn test_nearby_drops_far_results_and_sorts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api"))
      .and(query_param("q", HOUSING_TERM))
      .and(query_param("osm_tag", "tourism:hotel"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "features": [
          point("Far Motel", "motel", -97.00, 30.27),
          point("Mid Hostel", "hostel", -97.72, 30.27),
          point("Near Hotel", "hotel", -97.741, 30.271)
        ]
      })))
      .mount(&server)
      .await;

    let places = client(&server)
      .nearby_housing(GeoPoint::new(30.27, -97.74), 5.0)
      .await
      .unwrap();

    let names: Vec<_> = places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Near Hotel", "Mid Hostel"]);
    assert_eq!(places[0].kind, "hotel");
    assert_eq!(places[0].address, "Austin");
    assert!(places[0].distance_km < places[1].distance_km);
  }

  #[tokio::test]
  async fn test_server_error_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let err = client(&server).geocode("x").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
  }
}
