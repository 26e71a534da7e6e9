//! Record types for the ebschedule workspace.
//!
//! These types mirror the request and response shapes of the scheduling
//! service. Field names use the service's PascalCase wire names and fields
//! are declared in the service's order, so a record serialized through
//! `serde` produces keys in a stable, readable order.
//!
//! # Key Types
//!
//! - [`CreateScheduleInput`] -- desired state loaded from a schedule file
//! - [`GetScheduleOutput`] -- current state returned by the service
//! - [`Target`] -- what a schedule invokes
//! - [`GetScheduleGroupOutput`] / [`CreateScheduleGroupInput`] -- schedule groups

pub mod error;
pub mod group;
pub mod schedule;
pub mod target;
pub mod timestamp;

pub use error::TypeError;
pub use group::{
    CreateScheduleGroupInput, CreateScheduleGroupOutput, GetScheduleGroupInput,
    GetScheduleGroupOutput, ScheduleGroupState, Tag,
};
pub use schedule::{
    ActionAfterCompletion, CreateScheduleInput, CreateScheduleOutput, FlexibleTimeWindow,
    FlexibleTimeWindowMode, GetScheduleInput, GetScheduleOutput, ResultMetadata, ScheduleState,
    UpdateScheduleInput, UpdateScheduleOutput, DEFAULT_GROUP_NAME,
};
pub use target::{
    AwsVpcConfiguration, CapacityProviderStrategyItem, DeadLetterConfig, EcsParameters,
    EventBridgeParameters, KinesisParameters, NetworkConfiguration, PlacementConstraint,
    PlacementStrategy, RetryPolicy, SageMakerPipelineParameter, SageMakerPipelineParameters,
    SqsParameters, Target,
};
