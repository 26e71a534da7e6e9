//! In-memory scheduler for tests and dry runs.
//!
//! [`InMemoryScheduler`] keeps groups and schedules in `HashMap`s behind
//! `RwLock`s and behaves like the service for the operations ebschedule
//! uses: lookups of missing resources are `NotFound`, creating an existing
//! resource is a `Conflict`, and every account starts with the `default`
//! group.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use ebschedule_types::{
    CreateScheduleGroupInput, CreateScheduleGroupOutput, CreateScheduleInput,
    CreateScheduleOutput, GetScheduleGroupInput, GetScheduleGroupOutput, GetScheduleInput,
    GetScheduleOutput, ResultMetadata, ScheduleGroupState, UpdateScheduleInput,
    UpdateScheduleOutput, DEFAULT_GROUP_NAME,
};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::traits::SchedulerClient;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ACCOUNT: &str = "123456789012";

/// An in-memory implementation of [`SchedulerClient`].
#[derive(Debug)]
pub struct InMemoryScheduler {
    region: String,
    account: String,
    groups: RwLock<HashMap<String, GetScheduleGroupOutput>>,
    schedules: RwLock<HashMap<(String, String), GetScheduleOutput>>,
    requests: AtomicU64,
}

impl InMemoryScheduler {
    /// Create a scheduler holding only the `default` group.
    pub fn new() -> Self {
        Self::with_region(DEFAULT_REGION)
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        let scheduler = Self {
            region: region.into(),
            account: DEFAULT_ACCOUNT.to_string(),
            groups: RwLock::new(HashMap::new()),
            schedules: RwLock::new(HashMap::new()),
            requests: AtomicU64::new(0),
        };
        let group = scheduler.group_record(DEFAULT_GROUP_NAME);
        if let Ok(mut groups) = scheduler.groups.write() {
            groups.insert(DEFAULT_GROUP_NAME.to_string(), group);
        }
        scheduler
    }

    /// Number of schedules across all groups.
    pub fn schedule_count(&self) -> ClientResult<usize> {
        Ok(self.schedules.read().map_err(lock_error)?.len())
    }

    fn arn(&self, resource: &str) -> String {
        format!("arn:aws:scheduler:{}:{}:{resource}", self.region, self.account)
    }

    fn metadata(&self) -> Option<ResultMetadata> {
        let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        Some(ResultMetadata {
            request_id: Some(format!("req-{n:08}")),
        })
    }

    fn group_record(&self, name: &str) -> GetScheduleGroupOutput {
        let now = Utc::now();
        GetScheduleGroupOutput {
            arn: Some(self.arn(&format!("schedule-group/{name}"))),
            creation_date: Some(now),
            last_modification_date: Some(now),
            name: Some(name.to_string()),
            state: Some(ScheduleGroupState::Active),
            result_metadata: None,
        }
    }

    fn ensure_group(&self, group: &str) -> ClientResult<()> {
        let groups = self.groups.read().map_err(lock_error)?;
        if groups.contains_key(group) {
            Ok(())
        } else {
            Err(ClientError::NotFound {
                resource: "schedule group",
                name: group.to_string(),
            })
        }
    }
}

impl Default for InMemoryScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error<T>(e: PoisonError<T>) -> ClientError {
    ClientError::Transport(format!("lock poisoned: {e}"))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ClientResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ClientError::InvalidRequest(format!("{field} must be specified")))
}

fn group_of(group_name: &Option<String>) -> String {
    group_name
        .clone()
        .unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string())
}

/// Overwrite the mutable fields of a stored schedule with the request.
fn apply(record: &mut GetScheduleOutput, input: UpdateScheduleInput) {
    record.action_after_completion = input.action_after_completion;
    record.description = input.description;
    record.end_date = input.end_date;
    record.flexible_time_window = input.flexible_time_window;
    record.kms_key_arn = input.kms_key_arn;
    record.schedule_expression = input.schedule_expression;
    record.schedule_expression_timezone = input.schedule_expression_timezone;
    record.start_date = input.start_date;
    record.state = input.state;
    record.target = input.target;
    record.last_modification_date = Some(Utc::now());
}

#[async_trait]
impl SchedulerClient for InMemoryScheduler {
    async fn get_schedule_group(
        &self,
        input: &GetScheduleGroupInput,
    ) -> ClientResult<GetScheduleGroupOutput> {
        let name = required(&input.name, "Name")?;
        let groups = self.groups.read().map_err(lock_error)?;
        let mut group = groups.get(name).cloned().ok_or_else(|| ClientError::NotFound {
            resource: "schedule group",
            name: name.to_string(),
        })?;
        group.result_metadata = self.metadata();
        Ok(group)
    }

    async fn create_schedule_group(
        &self,
        input: &CreateScheduleGroupInput,
    ) -> ClientResult<CreateScheduleGroupOutput> {
        let name = required(&input.name, "Name")?;
        let record = self.group_record(name);
        let arn = record.arn.clone();
        let mut groups = self.groups.write().map_err(lock_error)?;
        if groups.contains_key(name) {
            return Err(ClientError::Conflict {
                resource: "schedule group",
                name: name.to_string(),
            });
        }
        groups.insert(name.to_string(), record);
        debug!(group = %name, "created schedule group");
        Ok(CreateScheduleGroupOutput {
            schedule_group_arn: arn,
            result_metadata: self.metadata(),
        })
    }

    async fn get_schedule(&self, input: &GetScheduleInput) -> ClientResult<GetScheduleOutput> {
        let name = required(&input.name, "Name")?;
        let group = group_of(&input.group_name);
        let schedules = self.schedules.read().map_err(lock_error)?;
        let mut schedule = schedules
            .get(&(group.clone(), name.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: "schedule",
                name: format!("{group}/{name}"),
            })?;
        schedule.result_metadata = self.metadata();
        Ok(schedule)
    }

    async fn create_schedule(
        &self,
        input: &CreateScheduleInput,
    ) -> ClientResult<CreateScheduleOutput> {
        let name = required(&input.name, "Name")?.to_string();
        let group = group_of(&input.group_name);
        self.ensure_group(&group)?;

        let key = (group.clone(), name.clone());
        let mut schedules = self.schedules.write().map_err(lock_error)?;
        if schedules.contains_key(&key) {
            return Err(ClientError::Conflict {
                resource: "schedule",
                name: format!("{group}/{name}"),
            });
        }

        let arn = self.arn(&format!("schedule/{group}/{name}"));
        let mut record = GetScheduleOutput {
            arn: Some(arn.clone()),
            creation_date: Some(Utc::now()),
            group_name: Some(group.clone()),
            name: Some(name.clone()),
            ..Default::default()
        };
        apply(&mut record, UpdateScheduleInput::from(input.clone()));
        schedules.insert(key, record);
        debug!(group = %group, schedule = %name, "created schedule");

        Ok(CreateScheduleOutput {
            schedule_arn: Some(arn),
            result_metadata: self.metadata(),
        })
    }

    async fn update_schedule(
        &self,
        input: &UpdateScheduleInput,
    ) -> ClientResult<UpdateScheduleOutput> {
        let name = required(&input.name, "Name")?.to_string();
        let group = group_of(&input.group_name);

        let mut schedules = self.schedules.write().map_err(lock_error)?;
        let record = schedules
            .get_mut(&(group.clone(), name.clone()))
            .ok_or_else(|| ClientError::NotFound {
                resource: "schedule",
                name: format!("{group}/{name}"),
            })?;
        apply(record, input.clone());
        debug!(group = %group, schedule = %name, "updated schedule");

        Ok(UpdateScheduleOutput {
            schedule_arn: record.arn.clone(),
            result_metadata: self.metadata(),
        })
    }
}
