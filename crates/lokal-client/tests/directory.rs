//! Integration tests for the directory endpoints of `BoardClient`.

use lokal_client::{BoardClient, ClientError};
use lokal_core::{LocationKind, LocationRecord};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BoardClient {
    BoardClient::with_base_url(base_url, 5, "lokal-test/0.1")
        .expect("client construction should not fail")
}

fn davao_del_norte() -> LocationRecord {
    LocationRecord::new(11, "Davao del Norte", "112300000", LocationKind::Province, None)
}

#[tokio::test]
async fn list_provinces_parses_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 11, "name": "Davao del Norte", "slug": "davao-del-norte", "geocode": "112300000"},
            {"id": 12, "name": "Siquijor", "slug": "siquijor", "geocode": "076100000"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provinces = test_client(&server.uri()).list_provinces().await.unwrap();

    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[0].slug, "davao-del-norte");
    assert_eq!(provinces[1].geocode, "076100000");
    assert!(provinces.iter().all(|p| p.kind == LocationKind::Province && p.parent_id.is_none()));
}

#[tokio::test]
async fn list_provinces_parses_paginated_wrapper() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "next": null, "previous": null,
            "results": [{"id": 12, "name": "Siquijor", "slug": "siquijor", "geocode": "076100000"}]
        })))
        .mount(&server)
        .await;

    let provinces = test_client(&server.uri()).list_provinces().await.unwrap();
    assert_eq!(provinces.len(), 1);
    assert_eq!(provinces[0].name, "Siquijor");
}

#[tokio::test]
async fn list_municipalities_parents_records_to_province() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces/davao-del-norte/municipalities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 201, "name": "City of Tagum", "slug": "city-of-tagum", "geocode": "112314000"},
            {"id": 202, "name": "Asuncion", "slug": "asuncion", "geocode": "112301000"}
        ])))
        .mount(&server)
        .await;

    let municipalities = test_client(&server.uri())
        .list_municipalities(&davao_del_norte())
        .await
        .unwrap();

    assert_eq!(municipalities.len(), 2);
    assert_eq!(municipalities[0].slug, "city-of-tagum");
    assert_eq!(municipalities[0].parent_id, Some(11));
    assert_eq!(municipalities[0].kind, LocationKind::Municipality);
}

#[tokio::test]
async fn list_barangays_queries_by_municipality_id_and_derives_slugs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/barangays"))
        .and(query_param("municipality", "201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9001, "name": "Apokon"},
            {"id": 9002, "name": "Magugpo Poblacion"}
        ])))
        .mount(&server)
        .await;

    let tagum = LocationRecord::new(201, "City of Tagum", "112314000", LocationKind::Municipality, Some(11));
    let barangays = test_client(&server.uri()).list_barangays(&tagum).await.unwrap();

    assert_eq!(barangays.len(), 2);
    assert_eq!(barangays[1].slug, "magugpo-poblacion");
    assert_eq!(barangays[1].geocode, "");
    assert_eq!(barangays[1].parent_id, Some(201));
}

#[tokio::test]
async fn unknown_province_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces/davao-del-norte/municipalities"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .list_municipalities(&davao_del_norte())
        .await;
    assert!(matches!(result, Err(ClientError::NotFound { .. })), "got {result:?}");
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).list_provinces().await;
    assert!(matches!(result, Err(ClientError::Deserialize { .. })), "got {result:?}");
}

#[tokio::test]
async fn server_errors_are_retried_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let provinces = client.list_provinces().await.expect("retry should recover");
    assert!(provinces.is_empty());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provinces"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_token("t0ken");
    client.list_provinces().await.unwrap();
}
