pub mod cluster;
pub mod environment;
pub mod logging;
pub mod matches;
pub mod names;
pub mod report;

pub use cluster::ClusterEngine;
pub use matches::{MatchRecord, MatchStore, RawExtract, SubmissionId};
pub use names::NameMap;
pub use report::{assemble, build_report, MatchCluster, Report};
