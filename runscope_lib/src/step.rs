//! Test steps: one HTTP request plus its assertions, variables, and scripts.
//!
//! Besides `request` steps a test may contain `pause`, `condition`, `ghost`
//! and `subtest` steps; they share the same record and only use the fields
//! that apply to them. The nested structure is passed through as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{endpoint, require, Client};
use crate::envelope::nullable;
use crate::error::{Error, Result};

pub const STEP_REQUEST: &str = "request";
pub const STEP_PAUSE: &str = "pause";
pub const STEP_CONDITION: &str = "condition";
pub const STEP_SUBTEST: &str = "subtest";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    #[serde(deserialize_with = "nullable")]
    pub form: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub assertions: Vec<Assertion>,
    #[serde(deserialize_with = "nullable")]
    pub variables: Vec<Variable>,
    #[serde(deserialize_with = "nullable")]
    pub scripts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Pause length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_value: Option<String>,
    /// Children of a condition step.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub is_custom_start_url: bool,
}

impl Step {
    /// A request step.
    pub fn request(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            step_type: Some(STEP_REQUEST.to_string()),
            method: Some(method.into()),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// A pause step of `seconds`.
    pub fn pause(seconds: i64) -> Self {
        Self {
            step_type: Some(STEP_PAUSE.to_string()),
            duration: Some(seconds),
            ..Self::default()
        }
    }

    /// A condition step comparing two values; children run when it holds.
    pub fn condition(
        left_value: impl Into<String>,
        comparison: impl Into<String>,
        right_value: impl Into<String>,
    ) -> Self {
        Self {
            step_type: Some(STEP_CONDITION.to_string()),
            left_value: Some(left_value.into()),
            comparison: Some(comparison.into()),
            right_value: Some(right_value.into()),
            ..Self::default()
        }
    }

    /// A step that runs another test.
    pub fn subtest(test_id: impl Into<String>) -> Self {
        Self {
            step_type: Some(STEP_SUBTEST.to_string()),
            test_id: Some(test_id.into()),
            ..Self::default()
        }
    }

    /// Append a child to a condition step.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }
}

/// An assertion on a response. In results, `result`, `target_value`,
/// `actual_value` and `error` are filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assertion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Assertion {
    pub fn new(
        source: impl Into<String>,
        comparison: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            comparison: Some(comparison.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

/// Request authentication for a step (basic, OAuth 1.0, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Auth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

/// A variable extracted from a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A script as reported in a test run. Test definitions list scripts as
/// plain strings instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn steps_path(bucket_key: &str, test_id: &str) -> Result<String> {
    require(bucket_key, "bucket key")?;
    require(test_id, "test id")?;
    Ok(endpoint(&["buckets", bucket_key, "tests", test_id, "steps"]))
}

fn step_path(bucket_key: &str, test_id: &str, step_id: &str) -> Result<String> {
    require(step_id, "step id")?;
    Ok(format!(
        "{}/{}",
        steps_path(bucket_key, test_id)?,
        endpoint(&[step_id])
    ))
}

impl Client {
    /// List all steps of a test.
    pub async fn list_steps(&self, bucket_key: &str, test_id: &str) -> Result<Vec<Step>> {
        self.get(&steps_path(bucket_key, test_id)?).await
    }

    pub async fn get_step(&self, bucket_key: &str, test_id: &str, step_id: &str) -> Result<Step> {
        self.get(&step_path(bucket_key, test_id, step_id)?).await
    }

    /// Append a step to a test.
    ///
    /// The service answers with the test's full step list; the created step
    /// is its last entry.
    pub async fn create_step(&self, bucket_key: &str, test_id: &str, step: &Step) -> Result<Step> {
        let created: StepOrSteps = self.post(&steps_path(bucket_key, test_id)?, step).await?;
        created.into_step()
    }

    pub async fn update_step(
        &self,
        bucket_key: &str,
        test_id: &str,
        step_id: &str,
        step: &Step,
    ) -> Result<Step> {
        self.put(&step_path(bucket_key, test_id, step_id)?, step)
            .await
    }

    pub async fn delete_step(&self, bucket_key: &str, test_id: &str, step_id: &str) -> Result<()> {
        self.delete(&step_path(bucket_key, test_id, step_id)?).await
    }
}

/// `POST .../steps` has been seen to return either the new step or the whole list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StepOrSteps {
    Many(Vec<Step>),
    One(Box<Step>),
}

impl Default for StepOrSteps {
    fn default() -> Self {
        StepOrSteps::Many(Vec::new())
    }
}

impl StepOrSteps {
    fn into_step(self) -> Result<Step> {
        match self {
            StepOrSteps::One(step) => Ok(*step),
            StepOrSteps::Many(mut steps) => steps
                .pop()
                .ok_or_else(|| Error::Other("create step response contained no steps".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_request_step_with_nulls() {
        let step: Step = serde_json::from_value(json!({
            "assertions": [{"comparison": "is_equal", "source": "response_status", "value": 200}],
            "auth": {},
            "body": "",
            "form": null,
            "headers": {},
            "method": "GET",
            "note": null,
            "step_type": "request",
            "url": "https://yourapihere.com/",
            "id": "53f8e1fd-0989-491a-9f15-cc055f27d097",
            "variables": []
        }))
        .unwrap();
        assert_eq!(step.step_type.as_deref(), Some(STEP_REQUEST));
        assert_eq!(step.assertions[0].value, Some(json!(200)));
        assert_eq!(step.auth, Some(Auth::default()));
        assert!(step.form.is_empty());
        assert!(step.note.is_none());
    }

    #[test]
    fn password_serializes_under_its_own_name() {
        let auth = Auth {
            auth_type: Some("basic".to_string()),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ..Auth::default()
        };
        let v = serde_json::to_value(&auth).unwrap();
        assert_eq!(v["username"], "user");
        assert_eq!(v["password"], "pass");
    }

    #[test]
    fn builders_fill_step_fields() {
        let step = Step::request("POST", "https://example.com/orders")
            .with_header("Accept", "application/json")
            .with_assertion(Assertion::new("response_status", "equal_number", 201));
        assert_eq!(step.headers["Accept"], vec!["application/json".to_string()]);
        assert_eq!(step.assertions.len(), 1);

        let pause = Step::pause(5);
        assert_eq!(pause.step_type.as_deref(), Some(STEP_PAUSE));
        assert_eq!(pause.duration, Some(5));
        let v = serde_json::to_value(&pause).unwrap();
        assert!(v.get("steps").is_none());
        assert!(v.get("url").is_none());
    }

    #[test]
    fn condition_and_subtest_builders() {
        let cond = Step::condition("{{status}}", "equal", "200").with_step(Step::subtest("t2"));
        assert_eq!(cond.step_type.as_deref(), Some(STEP_CONDITION));
        assert_eq!(cond.comparison.as_deref(), Some("equal"));
        assert_eq!(cond.steps[0].step_type.as_deref(), Some(STEP_SUBTEST));
        assert_eq!(cond.steps[0].test_id.as_deref(), Some("t2"));
        let v = serde_json::to_value(&cond).unwrap();
        assert_eq!(v["steps"][0]["test_id"], "t2");
    }

    #[test]
    fn null_flags_decode_as_false() {
        let step: Step =
            serde_json::from_value(json!({"step_type": "pause", "is_custom_start_url": null})).unwrap();
        assert!(!step.is_custom_start_url);
    }

    #[test]
    fn empty_create_response_is_an_error() {
        let none: StepOrSteps = serde_json::from_value(json!([])).unwrap();
        assert!(matches!(none.into_step(), Err(Error::Other(_))));
    }

    #[test]
    fn create_response_may_be_a_list() {
        let many: StepOrSteps =
            serde_json::from_value(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(many.into_step().unwrap().id.as_deref(), Some("b"));
        let one: StepOrSteps = serde_json::from_value(json!({"id": "c"})).unwrap();
        assert_eq!(one.into_step().unwrap().id.as_deref(), Some("c"));
    }

    #[test]
    fn step_path_rejects_missing_ids() {
        assert!(step_path("b", "t", "").is_err());
        assert_eq!(step_path("b", "t", "s").unwrap(), "buckets/b/tests/t/steps/s");
    }
}
