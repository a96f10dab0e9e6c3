//! Address autocomplete fan-out against mocked geocoders.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jolananas_core::geo::SuggestionSource;
use jolananas_integration_tests::geocode_config;
use jolananas_storefront::services::address::{AddressAutocomplete, GeocodeError};
use jolananas_storefront::services::retry::RetryPolicy;

fn autocomplete(server: &MockServer) -> AddressAutocomplete {
    AddressAutocomplete::new(geocode_config(server), RetryPolicy::NONE).unwrap()
}

fn gouv_body() -> serde_json::Value {
    json!({ "type": "FeatureCollection", "features": [{
        "geometry": { "type": "Point", "coordinates": [-1.5536, 47.2184] },
        "properties": {
            "label": "Place Royale 44000 Nantes",
            "score": 0.91,
            "street": "Place Royale",
            "postcode": "44000",
            "city": "Nantes"
        }
    }]})
}

fn nominatim_body() -> serde_json::Value {
    json!([{
        "display_name": "Nantes, Loire-Atlantique, France",
        "lat": "47.2186",
        "lon": "-1.5541",
        "importance": 0.62,
        "address": { "city": "Nantes", "postcode": "44000", "country_code": "fr" }
    }])
}

#[tokio::test]
async fn test_failed_provider_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "Nantes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gouv_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nominatim_body()))
        .mount(&server)
        .await;

    let suggestions = autocomplete(&server).suggest("Nantes", None).await.unwrap();

    assert_eq!(suggestions.len(), 2);
    let sources: Vec<SuggestionSource> = suggestions.iter().map(|s| s.source).collect();
    assert!(sources.contains(&SuggestionSource::Gouv));
    assert!(sources.contains(&SuggestionSource::Nominatim));
    assert!(!sources.contains(&SuggestionSource::Photon));
    assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_all_providers_failing_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = autocomplete(&server).suggest("Nantes", None).await.unwrap_err();
    assert!(matches!(err, GeocodeError::AllProvidersFailed(3)));
}

#[tokio::test]
async fn test_short_query_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let suggestions = autocomplete(&server).suggest("  Na ", None).await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_overlong_query_is_rejected() {
    let server = MockServer::start().await;
    let query = "a".repeat(201);

    let err = autocomplete(&server).suggest(&query, None).await.unwrap_err();
    assert!(matches!(err, GeocodeError::QueryTooLong));
}

#[tokio::test]
async fn test_results_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gouv_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let service = autocomplete(&server);
    let first = service.suggest("Nantes", Some(5)).await.unwrap();
    let second = service.suggest("  nantes ", Some(5)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].label, "Place Royale 44000 Nantes");
}
