use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schoolboard_core::cache::TtlPolicy;
use schoolboard_core::{ApiClient, ApiError, CacheError, ResourceCache, ResourceKey};

fn users_body() -> serde_json::Value {
    json!([
        {"id": "u1", "email": "ana@school.test", "full_name": "Ana", "role": "student", "approved": true},
        {"id": "u2", "email": "ben@school.test", "full_name": "Ben", "role": "student", "approved": false},
        {"id": "u3", "email": "cy@school.test", "full_name": "Cy", "role": "teacher", "approved": true}
    ])
}

fn cache_for(server: &MockServer) -> ResourceCache {
    let client = ApiClient::new(&server.uri()).unwrap();
    ResourceCache::new(client, TtlPolicy::default())
}

#[tokio::test]
async fn test_repeated_reads_hit_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Science Fair", "event_date": "2026-11-02"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let first = cache.get_events().await.unwrap();
    let second = cache.get_events().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].title, "Science Fair");
}

#[tokio::test]
async fn test_concurrent_views_share_one_users_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_body())
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let (all, students, teachers, pending) = futures::join!(
        cache.get_all_users(),
        cache.get_students(),
        cache.get_teachers(),
        cache.get_pending_users(),
    );

    assert_eq!(all.unwrap().len(), 3);
    assert_eq!(students.unwrap().len(), 2);
    assert_eq!(teachers.unwrap().len(), 1);
    assert_eq!(pending.unwrap()[0].id, "u2");
}

#[tokio::test]
async fn test_invalidate_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    cache.get_all_users().await.unwrap();
    cache.invalidate_cache([ResourceKey::AllUsers]);
    cache.get_all_users().await.unwrap();
}

#[tokio::test]
async fn test_server_error_message_reaches_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "network down"})))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let err = cache.get_schedules().await.unwrap_err();

    assert_eq!(err.to_string(), "Server error: network down");
    let api_error = err
        .producer_error()
        .and_then(|e| e.downcast_ref::<ApiError>())
        .unwrap();
    assert!(matches!(api_error, ApiError::ServerError(_)));
    assert!(!cache.has_data(ResourceKey::Schedules));
    assert!(!cache.is_loading(ResourceKey::Schedules));

    // Failures are not cached; the next read asks the server again.
    assert!(matches!(cache.get_schedules().await, Err(CacheError::Fetch(_))));
}

#[tokio::test]
async fn test_enveloped_and_null_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gallery/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "name": "Sports"}, {"id": 2, "name": "Arts"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/infrastructure/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/gallery/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"totalImages": 12, "totalSize": 4096}
        })))
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    let categories = cache.get_gallery_categories().await.unwrap();
    assert_eq!(categories.len(), 2);

    assert_eq!(cache.get_infrastructure_stats().await.unwrap(), None);
    assert!(cache.has_data(ResourceKey::InfrastructureStats));

    let stats = cache.get_gallery_stats().await.unwrap().unwrap();
    assert_eq!(stats.total_images, 12);
    assert_eq!(stats.total_size_bytes, 4096);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gallery/images"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "image_url": "https://cdn.school.test/7.jpg"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri())
        .unwrap()
        .with_token("secret-token".to_string());
    let cache = ResourceCache::new(client, TtlPolicy::default());

    let images = cache.get_gallery_images().await.unwrap();
    assert_eq!(images[0].id, 7);

    cache.remove_gallery_image(7).unwrap();
    assert!(cache.get_gallery_images().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let err = cache.get_events().await.unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized - token may be expired");
}
