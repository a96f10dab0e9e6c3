//! Geocoder adapters.
//!
//! Each provider has its own response shape; all of them are reduced to
//! [`Candidate`]s for ranking.

use serde::Deserialize;
use url::Url;

use jolananas_core::geo::{Candidate, SuggestionSource};

use super::GeocodeError;
use crate::config::GeocodeConfig;

/// Build the request URL for one provider.
pub(super) fn request_url(
    config: &GeocodeConfig,
    source: SuggestionSource,
    query: &str,
    limit: usize,
) -> Result<Url, GeocodeError> {
    let (base, path) = match source {
        SuggestionSource::Gouv => (&config.gouv_url, "/search/"),
        SuggestionSource::Photon => (&config.photon_url, "/api/"),
        SuggestionSource::Nominatim => (&config.nominatim_url, "/search"),
    };

    let mut url = Url::parse(&format!("{base}{path}")).map_err(|e| GeocodeError::Parse {
        source_name: source.as_str(),
        message: format!("invalid base URL: {e}"),
    })?;

    let limit = limit.to_string();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", query).append_pair("limit", &limit);
        match source {
            SuggestionSource::Gouv => {}
            SuggestionSource::Photon => {
                pairs.append_pair("lang", "fr");
            }
            SuggestionSource::Nominatim => {
                pairs
                    .append_pair("format", "jsonv2")
                    .append_pair("addressdetails", "1");
            }
        }
    }

    Ok(url)
}

/// Decode a provider response body into candidates.
pub(super) fn parse(
    source: SuggestionSource,
    body: &str,
    from_variation: bool,
) -> Result<Vec<Candidate>, GeocodeError> {
    let parse_error = |e: serde_json::Error| GeocodeError::Parse {
        source_name: source.as_str(),
        message: e.to_string(),
    };

    let candidates = match source {
        SuggestionSource::Gouv => serde_json::from_str::<FeatureCollection<GouvProperties>>(body)
            .map_err(parse_error)?
            .features
            .into_iter()
            .filter_map(Feature::into_gouv)
            .collect(),
        SuggestionSource::Photon => {
            serde_json::from_str::<FeatureCollection<PhotonProperties>>(body)
                .map_err(parse_error)?
                .features
                .into_iter()
                .filter_map(Feature::into_photon)
                .collect()
        }
        SuggestionSource::Nominatim => serde_json::from_str::<Vec<NominatimPlace>>(body)
            .map_err(parse_error)?
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .collect::<Vec<_>>(),
    };

    Ok(mark_variation(candidates, from_variation))
}

fn mark_variation(mut candidates: Vec<Candidate>, from_variation: bool) -> Vec<Candidate> {
    for c in &mut candidates {
        c.from_variation = from_variation;
    }
    candidates
}

// =============================================================================
// GeoJSON (Gouv, Photon)
// =============================================================================

#[derive(Debug, Deserialize)]
struct FeatureCollection<P> {
    #[serde(default = "Vec::new")]
    features: Vec<Feature<P>>,
}

#[derive(Debug, Deserialize)]
struct Feature<P> {
    geometry: Option<Geometry>,
    properties: P,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl Geometry {
    fn lat_lon(&self) -> (Option<f64>, Option<f64>) {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => (Some(*lat), Some(*lon)),
            _ => (None, None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GouvProperties {
    label: Option<String>,
    score: Option<f64>,
    housenumber: Option<String>,
    street: Option<String>,
    name: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    housenumber: Option<String>,
    street: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    country: Option<String>,
    countrycode: Option<String>,
}

impl Feature<GouvProperties> {
    fn into_gouv(self) -> Option<Candidate> {
        let (latitude, longitude) = self.geometry.as_ref().map_or((None, None), Geometry::lat_lon);
        let p = self.properties;
        let label = non_empty(p.label)?;

        Some(Candidate {
            label,
            house_number: non_empty(p.housenumber),
            street: non_empty(p.street).or_else(|| non_empty(p.name)),
            postcode: non_empty(p.postcode),
            city: non_empty(p.city),
            // The BAN only covers France
            country_code: Some("FR".to_string()),
            latitude,
            longitude,
            source: SuggestionSource::Gouv,
            relevance: p.score,
            from_variation: false,
        })
    }
}

impl Feature<PhotonProperties> {
    fn into_photon(self) -> Option<Candidate> {
        let (latitude, longitude) = self.geometry.as_ref().map_or((None, None), Geometry::lat_lon);
        let p = self.properties;

        let house_number = non_empty(p.housenumber);
        let street = non_empty(p.street).or_else(|| non_empty(p.name));
        let postcode = non_empty(p.postcode);
        let city = non_empty(p.city);

        let first = match (&house_number, &street) {
            (Some(n), Some(s)) => Some(format!("{n} {s}")),
            (None, Some(s)) => Some(s.clone()),
            _ => None,
        };
        let locality = match (&postcode, &city) {
            (Some(z), Some(c)) => Some(format!("{z} {c}")),
            (Some(z), None) => Some(z.clone()),
            (None, Some(c)) => Some(c.clone()),
            (None, None) => None,
        };
        let label = [first, locality, non_empty(p.country)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        if label.is_empty() {
            return None;
        }

        Some(Candidate {
            label,
            house_number,
            street,
            postcode,
            city,
            country_code: non_empty(p.countrycode).map(|c| c.to_ascii_uppercase()),
            latitude,
            longitude,
            source: SuggestionSource::Photon,
            relevance: None,
            from_variation: false,
        })
    }
}

// =============================================================================
// Nominatim
// =============================================================================

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    importance: Option<f64>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    country_code: Option<String>,
}

impl NominatimPlace {
    fn into_candidate(self) -> Option<Candidate> {
        let label = non_empty(self.display_name)?;
        let a = self.address;

        Some(Candidate {
            label,
            house_number: non_empty(a.house_number),
            street: non_empty(a.road),
            postcode: non_empty(a.postcode),
            city: non_empty(a.city)
                .or_else(|| non_empty(a.town))
                .or_else(|| non_empty(a.village))
                .or_else(|| non_empty(a.municipality)),
            country_code: non_empty(a.country_code).map(|c| c.to_ascii_uppercase()),
            latitude: self.lat.and_then(|v| v.parse().ok()),
            longitude: self.lon.and_then(|v| v.parse().ok()),
            source: SuggestionSource::Nominatim,
            relevance: self.importance,
            from_variation: false,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_urls() {
        let config = GeocodeConfig::default();

        let gouv = request_url(&config, SuggestionSource::Gouv, "12 rue de l'Église", 8).unwrap();
        assert_eq!(gouv.path(), "/search/");
        assert!(gouv.query().unwrap().contains("limit=8"));

        let photon = request_url(&config, SuggestionSource::Photon, "nantes", 5).unwrap();
        assert_eq!(photon.path(), "/api/");
        assert!(photon.query().unwrap().contains("lang=fr"));

        let nominatim = request_url(&config, SuggestionSource::Nominatim, "nantes", 5).unwrap();
        let query = nominatim.query().unwrap();
        assert!(query.contains("format=jsonv2"));
        assert!(query.contains("addressdetails=1"));
    }

    #[test]
    fn test_parse_gouv() {
        let body = r#"{"type":"FeatureCollection","features":[{
            "geometry":{"type":"Point","coordinates":[-1.55,47.21]},
            "properties":{"label":"12 Rue des Ananas 44000 Nantes","score":0.93,
                "housenumber":"12","street":"Rue des Ananas","postcode":"44000","city":"Nantes"}
        }]}"#;

        let candidates = parse(SuggestionSource::Gouv, body, false).unwrap();
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.label, "12 Rue des Ananas 44000 Nantes");
        assert_eq!(c.country_code.as_deref(), Some("FR"));
        assert_eq!(c.latitude, Some(47.21));
        assert_eq!(c.longitude, Some(-1.55));
        assert_eq!(c.relevance, Some(0.93));
    }

    #[test]
    fn test_parse_photon_builds_label() {
        let body = r#"{"features":[{
            "geometry":{"coordinates":[2.35,48.85]},
            "properties":{"housenumber":"1","street":"Rue de Rivoli","postcode":"75001",
                "city":"Paris","country":"France","countrycode":"fr"}
        },{
            "geometry":null,
            "properties":{}
        }]}"#;

        let candidates = parse(SuggestionSource::Photon, body, true).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "1 Rue de Rivoli, 75001 Paris, France");
        assert_eq!(candidates[0].country_code.as_deref(), Some("FR"));
        assert!(candidates[0].from_variation);
    }

    #[test]
    fn test_parse_nominatim() {
        let body = r#"[{"display_name":"Place Royale, Nantes, France","lat":"47.2135","lon":"-1.5592",
            "importance":0.41,"address":{"road":"Place Royale","town":"Nantes","country_code":"fr"}}]"#;

        let candidates = parse(SuggestionSource::Nominatim, body, false).unwrap();
        assert_eq!(candidates[0].city.as_deref(), Some("Nantes"));
        assert_eq!(candidates[0].latitude, Some(47.2135));
        assert_eq!(candidates[0].country_code.as_deref(), Some("FR"));
    }

    #[test]
    fn test_parse_error_names_provider() {
        let err = parse(SuggestionSource::Nominatim, "{not json", false).unwrap_err();
        assert!(err.to_string().contains("nominatim"));
    }
}
