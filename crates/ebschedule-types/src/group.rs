//! Schedule group requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::ResultMetadata;
use crate::timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleGroupState {
    Active,
    Deleting,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetScheduleGroupInput {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetScheduleGroupOutput {
    pub arn: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub last_modification_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub state: Option<ScheduleGroupState>,
    #[serde(default)]
    pub result_metadata: Option<ResultMetadata>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateScheduleGroupInput {
    pub name: Option<String>,
    pub client_token: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateScheduleGroupOutput {
    pub schedule_group_arn: Option<String>,
    #[serde(default)]
    pub result_metadata: Option<ResultMetadata>,
}
