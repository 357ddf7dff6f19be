//! Wire-level tests for the Supabase REST client against a mock server.

use chrono::NaiveDate;
use portal_edge_gateway::config::SupabaseConfig;
use portal_edge_gateway::error::AppError;
use portal_edge_gateway::supabase::{
    NewAppointment, NewContact, PortalDatabase, SupabaseClient,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.uri(),
        api_key: "test-key".to_string(),
        anon_key: None,
        timeout_ms: 5000,
    })
    .unwrap()
}

#[tokio::test]
async fn list_articles_sends_projection_and_ordering() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/blog_articles"))
        .and(query_param("order", "published_at.desc"))
        .and(query_param("published", "eq.true"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "title": "Derechos Fundamentales en Ecuador",
                "slug": "derechos-fundamentales",
                "author": "Dr. Wilson Ipiales",
                "category": "derecho-constitucional",
                "published_at": "2025-03-15"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = client.list_articles().await.unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].slug, "derechos-fundamentales");
}

#[tokio::test]
async fn get_article_filters_by_slug() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/blog_articles"))
        .and(query_param("slug", "eq.divorcios-2025"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "title": "Procedimiento para Divorcios", "slug": "divorcios-2025" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let article = client.get_article("divorcios-2025").await.unwrap();

    assert_eq!(article.unwrap().slug, "divorcios-2025");
}

#[tokio::test]
async fn get_article_empty_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/blog_articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_article("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn booked_slots_projects_the_slot_column() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2025-04-25"))
        .and(query_param("select", "slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "slot": "10:00" },
            { "slot": "15:00" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let date = NaiveDate::from_ymd_opt(2025, 4, 25).unwrap();
    let slots = client.booked_slots(date).await.unwrap();

    assert_eq!(slots, vec!["10:00".to_string(), "15:00".to_string()]);
}

#[tokio::test]
async fn insert_contact_posts_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/contact_messages"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .insert_contact(NewContact {
            name: "María".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            message: "Hola".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn insert_appointment_conflict_maps_to_conflict_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .insert_appointment(NewAppointment {
            name: "María".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            date: NaiveDate::from_ymd_opt(2025, 4, 25).unwrap(),
            slot: "10:00".to_string(),
            notes: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn sign_in_success_parses_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "user": { "id": "u-1", "email": "maria@example.com" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.sign_in("maria@example.com", "secret").await.unwrap();

    assert_eq!(session.access_token, "jwt-token");
    assert_eq!(session.user["email"], "maria@example.com");
}

#[tokio::test]
async fn sign_in_rejection_surfaces_the_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sign_in("maria@example.com", "wrong").await.unwrap_err();

    match err {
        AppError::Unauthorized(message) => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_in_rate_limit_is_not_a_credential_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "msg": "Rate limit exceeded"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sign_in("maria@example.com", "secret").await.unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn upstream_5xx_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/blog_articles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_articles().await.unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
    assert!(err.to_string().contains("500"));
}
