//! Test run results.

mod common;

use chrono::{TimeZone, Utc};
use common::{envelope, setup};
use runscope_lib::ListResultsOptions;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn summary_json(run_id: &str, result: &str) -> serde_json::Value {
    json!({
        "agent": null,
        "assertions_defined": 3,
        "assertions_failed": 0,
        "assertions_passed": 3,
        "bucket_key": "6knqwu7hbhf0",
        "finished_at": 1406061608.506811,
        "region": "us1",
        "requests_executed": 1,
        "result": result,
        "scripts_defined": 0,
        "scripts_failed": 0,
        "scripts_passed": 0,
        "started_at": 1406036406.68105,
        "test_run_id": run_id,
        "test_run_url": "https://api.runscope.com/buckets/6knqwu7hbhf0/tests/1/results/1",
        "test_id": "1",
        "variables_defined": 2,
        "variables_failed": 0,
        "variables_passed": 2,
        "environment_id": "1eeb3695",
        "environment_name": "Production"
    })
}

#[tokio::test]
async fn list_results_sends_filters() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/tests/1/results"))
        .and(query_param("count", "10"))
        .and(query_param("since", "1406036406"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            summary_json("a", "pass"),
            summary_json("b", "fail")
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let opts = ListResultsOptions {
        count: Some(10),
        since: Some(Utc.timestamp_opt(1406036406, 0).unwrap()),
        before: None,
    };
    let results = client.list_results("1", "1", &opts).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].passed());
    assert!(!results[1].passed());
    assert_eq!(results[0].environment_name.as_deref(), Some("Production"));
    assert!(results[0].agent.is_none());
}

#[tokio::test]
async fn get_result_with_requests() {
    let (server, client) = setup().await;
    let mut detail = summary_json("1", "pass");
    detail["requests"] = json!([{
        "assertions": [{
            "actual_value": 200,
            "comparison": "equal_number",
            "error": null,
            "property": null,
            "result": "pass",
            "source": "response_status",
            "target_value": "200"
        }],
        "assertions_defined": 1,
        "assertions_failed": 0,
        "assertions_passed": 1,
        "method": "GET",
        "result": "pass",
        "scripts": [{"error": null, "output": "ok", "result": "pass"}],
        "scripts_defined": 1,
        "scripts_failed": 0,
        "scripts_passed": 1,
        "url": "https://yourapihere.com/",
        "variables": [{"name": "origin", "property": "origin", "result": "pass", "source": "response_json", "value": "127.0.0.1"}],
        "variables_defined": 1,
        "variables_failed": 0,
        "variables_passed": 1
    }]);
    Mock::given(method("GET"))
        .and(path("/buckets/1/tests/1/results/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(detail)))
        .mount(&server)
        .await;

    let result = client.get_result("1", "1", "1").await.unwrap();
    assert_eq!(result.requests.len(), 1);
    let request = &result.requests[0];
    assert_eq!(request.method.as_deref(), Some("GET"));
    assert_eq!(request.assertions[0].actual_value, Some(json!(200)));
    assert_eq!(request.scripts[0].output.as_deref(), Some("ok"));
    assert_eq!(request.variables[0].value, Some(json!("127.0.0.1")));
    assert!(result.started().unwrap() < result.finished().unwrap());
}

#[tokio::test]
async fn get_latest_result() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/1/tests/1/results/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(summary_json("9", "working"))))
        .expect(1)
        .mount(&server)
        .await;

    let latest = client.get_latest_result("1", "1").await.unwrap();
    assert_eq!(latest.test_run_id.as_deref(), Some("9"));
    assert_eq!(latest.result.as_deref(), Some("working"));
}
