//! JSON-over-HTTP client for the scheduling service.
//!
//! Each operation is one REST call whose request and response bodies are the
//! PascalCase records from `ebschedule-types`. Requests are not signed, so
//! this targets local emulators or a signing proxy.

use async_trait::async_trait;
use ebschedule_types::{
    CreateScheduleGroupInput, CreateScheduleGroupOutput, CreateScheduleInput,
    CreateScheduleOutput, GetScheduleGroupInput, GetScheduleGroupOutput, GetScheduleInput,
    GetScheduleOutput, UpdateScheduleInput, UpdateScheduleOutput, DEFAULT_GROUP_NAME,
};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::traits::SchedulerClient;

/// A [`SchedulerClient`] backed by HTTP calls.
#[derive(Clone, Debug)]
pub struct HttpScheduler {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpScheduler {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base = config.base_url()?;
        let base_url = Url::parse(&base)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid endpoint {base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(format!("invalid endpoint {base}")));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, collection: &str, name: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("invalid endpoint {}", self.base_url))
            })?
            .pop_if_empty()
            .push(collection)
            .push(name);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        name: &str,
    ) -> ClientResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        debug!(status = %status, resource, name, "scheduler response");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                resource,
                name: name.to_string(),
            });
        }
        if status == StatusCode::CONFLICT {
            return Err(ClientError::Conflict {
                resource,
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// The service's `Message` field, the raw body, or the status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for key in ["Message", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        text
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ClientResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ClientError::InvalidRequest(format!("{field} must be specified")))
}

#[async_trait]
impl SchedulerClient for HttpScheduler {
    async fn get_schedule_group(
        &self,
        input: &GetScheduleGroupInput,
    ) -> ClientResult<GetScheduleGroupOutput> {
        let name = required(&input.name, "Name")?;
        let url = self.url("schedule-groups", name)?;
        self.send(self.http.get(url), "schedule group", name).await
    }

    async fn create_schedule_group(
        &self,
        input: &CreateScheduleGroupInput,
    ) -> ClientResult<CreateScheduleGroupOutput> {
        let name = required(&input.name, "Name")?;
        let url = self.url("schedule-groups", name)?;
        self.send(self.http.post(url).json(input), "schedule group", name).await
    }

    async fn get_schedule(&self, input: &GetScheduleInput) -> ClientResult<GetScheduleOutput> {
        let name = required(&input.name, "Name")?;
        let group = input.group_name.as_deref().unwrap_or(DEFAULT_GROUP_NAME);
        let url = self.url("schedules", name)?;
        let request = self.http.get(url).query(&[("groupName", group)]);
        self.send(request, "schedule", &format!("{group}/{name}")).await
    }

    async fn create_schedule(
        &self,
        input: &CreateScheduleInput,
    ) -> ClientResult<CreateScheduleOutput> {
        let name = required(&input.name, "Name")?;
        let url = self.url("schedules", name)?;
        self.send(self.http.post(url).json(input), "schedule", name).await
    }

    async fn update_schedule(
        &self,
        input: &UpdateScheduleInput,
    ) -> ClientResult<UpdateScheduleOutput> {
        let name = required(&input.name, "Name")?;
        let url = self.url("schedules", name)?;
        self.send(self.http.put(url).json(input), "schedule", name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn get_schedule_handler(
        Path(name): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> (AxumStatus, Json<Value>) {
        if name != "nightly" {
            return (
                AxumStatus::NOT_FOUND,
                Json(json!({"Message": format!("Schedule {name} does not exist.")})),
            );
        }
        (
            AxumStatus::OK,
            Json(json!({
                "Arn": "arn:aws:scheduler:us-east-1:123456789012:schedule/default/nightly",
                "CreationDate": 1_700_000_000.5,
                "GroupName": query.get("groupName"),
                "Name": name,
                "ScheduleExpression": "rate(1 hour)",
                "FlexibleTimeWindow": {"Mode": "OFF"},
                "State": "ENABLED",
            })),
        )
    }

    async fn create_schedule_handler(
        Path(name): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        assert_eq!(body["Name"], name.as_str());
        let arn = format!("arn:aws:scheduler:us-east-1:123456789012:schedule/default/{name}");
        Json(json!({ "ScheduleArn": arn }))
    }

    async fn update_schedule_handler() -> (AxumStatus, Json<Value>) {
        (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"Message": "boom"})))
    }

    async fn get_group_handler() -> AxumStatus {
        AxumStatus::NOT_FOUND
    }

    async fn create_group_handler() -> AxumStatus {
        AxumStatus::CONFLICT
    }

    async fn serve() -> HttpScheduler {
        let router = Router::new()
            .route(
                "/schedules/:name",
                get(get_schedule_handler)
                    .post(create_schedule_handler)
                    .put(update_schedule_handler),
            )
            .route(
                "/schedule-groups/:name",
                get(get_group_handler).post(create_group_handler),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        HttpScheduler::new(&ClientConfig {
            endpoint: Some(format!("http://{addr}")),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn get_schedule_decodes_record() {
        let client = serve().await;
        let out = client
            .get_schedule(&GetScheduleInput { group_name: None, name: Some("nightly".into()) })
            .await
            .unwrap();
        assert_eq!(out.group_name.as_deref(), Some("default"));
        assert_eq!(out.schedule_expression.as_deref(), Some("rate(1 hour)"));
        assert_eq!(
            out.creation_date.map(|t| ebschedule_types::timestamp::format_timestamp(&t)),
            Some("2023-11-14T22:13:20.500Z".to_string())
        );
    }

    #[tokio::test]
    async fn missing_resources_are_not_found() {
        let client = serve().await;
        let err = client
            .get_schedule(&GetScheduleInput {
                group_name: Some("batch".into()),
                name: Some("other".into()),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "schedule not found: batch/other");

        let err = client
            .get_schedule_group(&GetScheduleGroupInput { name: Some("batch".into()) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_posts_the_record() {
        let client = serve().await;
        let out = client
            .create_schedule(&CreateScheduleInput {
                name: Some("nightly".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            out.schedule_arn.as_deref(),
            Some("arn:aws:scheduler:us-east-1:123456789012:schedule/default/nightly")
        );
        assert!(out.result_metadata.is_none());
    }

    #[tokio::test]
    async fn service_errors_carry_status_and_message() {
        let client = serve().await;
        let err = client
            .update_schedule(&UpdateScheduleInput {
                name: Some("nightly".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, ref message } if message == "boom"));

        let err = client
            .create_schedule_group(&CreateScheduleGroupInput {
                name: Some("batch".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict { .. }));
    }

    #[test]
    fn error_message_falls_back_to_body_then_reason() {
        assert_eq!(error_message(StatusCode::BAD_REQUEST, b"{\"message\":\"bad\"}"), "bad");
        assert_eq!(error_message(StatusCode::BAD_REQUEST, b"plain text"), "plain text");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b""), "Bad Gateway");
    }

    #[test]
    fn urls_escape_names_and_keep_base_path() {
        let client = HttpScheduler::new(&ClientConfig {
            endpoint: Some("http://localhost:4566/api/".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.url("schedules", "a b").unwrap().as_str(),
            "http://localhost:4566/api/schedules/a%20b"
        );
    }
}
