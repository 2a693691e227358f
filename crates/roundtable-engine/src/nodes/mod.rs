//! Graph nodes: one worker per registered agent plus the routing supervisor.

pub mod supervisor;
pub mod worker;

pub use supervisor::SupervisorNode;
pub use worker::WorkerNode;
