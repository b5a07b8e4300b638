pub mod process_checker;
pub mod reporter;
pub mod snapshot;

pub use process_checker::{MatchMode, ServiceChecker};
pub use reporter::{write_report, OutputFormat};
pub use snapshot::{ProcessSnapshotProvider, SysinfoSnapshotProvider};
