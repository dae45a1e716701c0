//! Test-scoped and shared environments.

mod common;

use common::{envelope, setup};
use runscope_lib::Environment;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn environment_json(test_id: Option<&str>) -> serde_json::Value {
    json!({
        "emails": {
            "notify_all": false,
            "notify_on": "all",
            "notify_threshold": 1,
            "recipients": [{"email": "grace@example.com", "name": "Grace Hopper", "id": "4ee15ecc"}]
        },
        "initial_variables": {"base_url": "https://api.example.com"},
        "integrations": [],
        "name": "Test Settings",
        "parent_environment_id": null,
        "preserve_cookies": false,
        "regions": ["us1", "eu1"],
        "remote_agents": [{"name": "my-agent", "uuid": "141d4dbc"}],
        "script": "",
        "test_id": test_id,
        "id": "1",
        "verify_ssl": true,
        "webhooks": ["https://example.com/hook"]
    })
}

#[tokio::test]
async fn list_test_environments() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/tests/1/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([environment_json(Some("1"))]))))
        .mount(&server)
        .await;

    let envs = client.list_test_environments("1", "1").await.unwrap();
    assert_eq!(envs.len(), 1);
    assert!(!envs[0].is_shared());
    assert_eq!(envs[0].remote_agents[0].name.as_deref(), Some("my-agent"));
    assert_eq!(envs[0].webhooks, vec!["https://example.com/hook".to_string()]);
}

#[tokio::test]
async fn list_shared_environments() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([environment_json(None)]))))
        .mount(&server)
        .await;

    let envs = client.list_shared_environments("1").await.unwrap();
    assert!(envs[0].is_shared());
    let emails = envs[0].emails.as_ref().unwrap();
    assert_eq!(emails.recipients[0].name.as_deref(), Some("Grace Hopper"));
}

#[tokio::test]
async fn get_test_and_shared_environment() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/tests/1/environments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(environment_json(Some("1")))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/environments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(environment_json(None))))
        .mount(&server)
        .await;

    let test_env = client.get_test_environment("1", "1", "1").await.unwrap();
    assert_eq!(test_env.test_id.as_deref(), Some("1"));
    let shared = client.get_shared_environment("1", "1").await.unwrap();
    assert_eq!(
        shared.initial_variables.get("base_url").map(String::as_str),
        Some("https://api.example.com")
    );
}

#[tokio::test]
async fn create_environments() {
    let (server, client) = setup().await;
    let input = Environment::new("Test Settings").with_variable("base_url", "https://api.example.com");
    Mock::given(method("POST"))
        .and(path("/buckets/1/tests/1/environments"))
        .and(body_partial_json(json!({
            "name": "Test Settings",
            "verify_ssl": true,
            "initial_variables": {"base_url": "https://api.example.com"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(environment_json(Some("1")))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/buckets/1/environments"))
        .and(body_partial_json(json!({"name": "Test Settings"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(environment_json(None))))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_test_environment("1", "1", &input).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("1"));
    let shared = client.create_shared_environment("1", &input).await.unwrap();
    assert!(shared.is_shared());
}

#[tokio::test]
async fn update_environments() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/buckets/1/tests/1/environments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(environment_json(Some("1")))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/buckets/1/environments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(environment_json(None))))
        .expect(1)
        .mount(&server)
        .await;

    let mut env = Environment::new("Test Settings");
    env.regions = vec!["us1".to_string(), "eu1".to_string()];
    let updated = client.update_test_environment("1", "1", "1", &env).await.unwrap();
    assert_eq!(updated.regions.len(), 2);
    client.update_shared_environment("1", "1", &env).await.unwrap();
}

#[tokio::test]
async fn delete_environments() {
    let (server, client) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/buckets/1/environments/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/buckets/1/tests/1/environments/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_environment("1", "1").await.unwrap();
    client.delete_test_environment("1", "1", "2").await.unwrap();
}
