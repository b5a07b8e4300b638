pub mod process;
pub mod service;

pub use process::ProcessEntry;
pub use service::{CheckResult, ServiceCheck, ServiceName, ServiceStatus};
