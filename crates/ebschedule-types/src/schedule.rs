//! Schedule requests and responses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::target::Target;
use crate::timestamp;

/// Group used when a schedule file does not name one.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// Whether a schedule fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleState {
    Enabled,
    Disabled,
}

impl fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "ENABLED"),
            Self::Disabled => write!(f, "DISABLED"),
        }
    }
}

/// What happens to a one-time schedule after its last invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionAfterCompletion {
    None,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlexibleTimeWindowMode {
    Off,
    Flexible,
}

/// Window within which the service may invoke the target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlexibleTimeWindow {
    pub mode: Option<FlexibleTimeWindowMode>,
    pub maximum_window_in_minutes: Option<i32>,
}

/// Response envelope metadata attached by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultMetadata {
    pub request_id: Option<String>,
}

/// Desired state of a schedule, as written in a schedule file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateScheduleInput {
    pub action_after_completion: Option<ActionAfterCompletion>,
    pub client_token: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub flexible_time_window: Option<FlexibleTimeWindow>,
    pub group_name: Option<String>,
    pub kms_key_arn: Option<String>,
    pub name: Option<String>,
    pub schedule_expression: Option<String>,
    pub schedule_expression_timezone: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    pub state: Option<ScheduleState>,
    pub target: Option<Target>,
}

impl CreateScheduleInput {
    /// Fill in the group name when the file leaves it out.
    pub fn apply_defaults(&mut self) {
        if self.group_name.is_none() {
            self.group_name = Some(DEFAULT_GROUP_NAME.to_string());
        }
    }

    /// Check the fields every request needs.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.is_none() {
            return Err(TypeError::MissingField("Name"));
        }
        Ok(())
    }

    /// The lookup key for this schedule.
    pub fn lookup(&self) -> GetScheduleInput {
        GetScheduleInput {
            group_name: self.group_name.clone(),
            name: self.name.clone(),
        }
    }
}

/// Replacement state for an existing schedule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateScheduleInput {
    pub action_after_completion: Option<ActionAfterCompletion>,
    pub client_token: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub flexible_time_window: Option<FlexibleTimeWindow>,
    pub group_name: Option<String>,
    pub kms_key_arn: Option<String>,
    pub name: Option<String>,
    pub schedule_expression: Option<String>,
    pub schedule_expression_timezone: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    pub state: Option<ScheduleState>,
    pub target: Option<Target>,
}

impl From<CreateScheduleInput> for UpdateScheduleInput {
    fn from(input: CreateScheduleInput) -> Self {
        Self {
            action_after_completion: input.action_after_completion,
            client_token: input.client_token,
            description: input.description,
            end_date: input.end_date,
            flexible_time_window: input.flexible_time_window,
            group_name: input.group_name,
            kms_key_arn: input.kms_key_arn,
            name: input.name,
            schedule_expression: input.schedule_expression,
            schedule_expression_timezone: input.schedule_expression_timezone,
            start_date: input.start_date,
            state: input.state,
            target: input.target,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetScheduleInput {
    pub group_name: Option<String>,
    pub name: Option<String>,
}

/// Current state of a schedule as reported by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetScheduleOutput {
    pub action_after_completion: Option<ActionAfterCompletion>,
    pub arn: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub creation_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub flexible_time_window: Option<FlexibleTimeWindow>,
    pub group_name: Option<String>,
    pub kms_key_arn: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub last_modification_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub schedule_expression: Option<String>,
    pub schedule_expression_timezone: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    pub state: Option<ScheduleState>,
    pub target: Option<Target>,
    #[serde(default)]
    pub result_metadata: Option<ResultMetadata>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateScheduleOutput {
    pub schedule_arn: Option<String>,
    #[serde(default)]
    pub result_metadata: Option<ResultMetadata>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateScheduleOutput {
    pub schedule_arn: Option<String>,
    #[serde(default)]
    pub result_metadata: Option<ResultMetadata>,
}
