//! Integration tests for listing/announcement retrieval and submission.

use lokal_client::{BoardClient, ClientError, ListingForm};
use lokal_core::LocalFile;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BoardClient {
    BoardClient::with_base_url(base_url, 5, "lokal-test/0.1")
        .expect("client construction should not fail")
}

fn house_form() -> ListingForm {
    ListingForm {
        title: "House and lot in Tagum".to_owned(),
        description: "Two storey, near the market".to_owned(),
        price: Some("2500000".to_owned()),
        category: Some(5),
        province: Some(11),
        municipality: Some(201),
        ..ListingForm::default()
    }
}

#[tokio::test]
async fn list_listings_sends_params_and_reads_paginated_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .and(query_param("province", "112300000"))
        .and(query_param("category", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 31,
            "next": "http://example/listings?page=2",
            "results": [{"id": 1, "title": "House", "price": "2000000.00", "status": "active"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .list_listings([("province", "112300000"), ("category", "5")])
        .await
        .unwrap();

    assert_eq!(page.count, 31);
    assert!(page.has_next);
    assert_eq!(page.results[0].title, "House");
    assert_eq!(page.results[0].price.as_deref(), Some("2000000.00"));
}

#[tokio::test]
async fn list_announcements_reads_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/announcements"))
        .and(query_param("province", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "title": "Road closure", "priority": "urgent", "is_province_wide": true},
            {"id": 5, "title": "Fiesta schedule"}
        ])))
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .list_announcements([("province", "11")])
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    assert!(!page.has_next);
    assert!(page.results[0].is_province_wide);
    assert!(!page.results[1].is_province_wide);
}

#[tokio::test]
async fn create_listing_sends_reused_ids_and_file_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_string_contains("name=\"reused_image_ids\""))
        .and(body_string_contains("name=\"uploaded_images\"; filename=\"front.png\""))
        .and(body_string_contains("House and lot in Tagum"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77, "title": "House and lot in Tagum", "images": [{"id": 1}, {"id": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("front.png");
    std::fs::write(&file_path, b"fake png bytes").unwrap();

    let created = test_client(&server.uri())
        .create_listing(&house_form(), &[314], &[LocalFile::from_path(&file_path)])
        .await
        .expect("submission should succeed");

    assert_eq!(created.id, 77);
    assert_eq!(created.images.len(), 2);
}

#[tokio::test]
async fn create_listing_surfaces_field_errors_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": ["Ensure this field has no more than 200 characters."],
            "price": ["A valid number is required."]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .create_listing(&house_form(), &[], &[])
        .await;

    match result {
        Err(ClientError::SubmissionRejected { fields }) => {
            assert_eq!(
                fields["title"],
                vec!["Ensure this field has no more than 200 characters.".to_owned()]
            );
            assert_eq!(fields["price"], vec!["A valid number is required.".to_owned()]);
        }
        other => panic!("expected SubmissionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn create_listing_is_not_retried_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(3, 0);
    let result = client.create_listing(&house_form(), &[], &[]).await;
    assert!(matches!(
        result,
        Err(ClientError::UnexpectedStatus { status: 502, .. })
    ));
}

#[tokio::test]
async fn create_listing_reports_unreadable_upload() {
    let server = MockServer::start().await;
    let missing = LocalFile::from_path("/definitely/not/here.jpg");
    let result = test_client(&server.uri())
        .create_listing(&house_form(), &[], &[missing])
        .await;
    assert!(matches!(result, Err(ClientError::Io { .. })), "got {result:?}");
}
