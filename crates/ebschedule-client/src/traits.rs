use async_trait::async_trait;
use ebschedule_types::{
    CreateScheduleGroupInput, CreateScheduleGroupOutput, CreateScheduleInput,
    CreateScheduleOutput, GetScheduleGroupInput, GetScheduleGroupOutput, GetScheduleInput,
    GetScheduleOutput, UpdateScheduleInput, UpdateScheduleOutput,
};

use crate::error::ClientResult;

/// Operations ebschedule needs from the scheduling service.
///
/// Lookups of missing resources fail with
/// [`ClientError::NotFound`](crate::ClientError::NotFound).
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    async fn get_schedule_group(
        &self,
        input: &GetScheduleGroupInput,
    ) -> ClientResult<GetScheduleGroupOutput>;
    async fn create_schedule_group(
        &self,
        input: &CreateScheduleGroupInput,
    ) -> ClientResult<CreateScheduleGroupOutput>;
    async fn get_schedule(&self, input: &GetScheduleInput) -> ClientResult<GetScheduleOutput>;
    async fn create_schedule(
        &self,
        input: &CreateScheduleInput,
    ) -> ClientResult<CreateScheduleOutput>;
    async fn update_schedule(
        &self,
        input: &UpdateScheduleInput,
    ) -> ClientResult<UpdateScheduleOutput>;
}
