//! Scheduler service clients for ebschedule.
//!
//! [`SchedulerClient`] is the seam between the commands and the service.
//! [`HttpScheduler`] talks JSON over HTTP; [`InMemoryScheduler`] keeps
//! everything in process for tests.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpScheduler;
pub use memory::InMemoryScheduler;
pub use traits::SchedulerClient;
