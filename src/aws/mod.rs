//! AWS-backed implementations of the collaborator traits.

pub mod cloudwatch;
pub mod pi;
pub mod rds;

pub use cloudwatch::CloudWatchSink;
pub use pi::PerformanceInsights;
pub use rds::RdsDiscovery;
