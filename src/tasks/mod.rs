pub mod heartbeat;
pub mod poll_lifecycle;
pub mod shutdown;
