//! The outbound notification boundary of the tower and the sinks shipped with it.

mod channel_sink;
mod log_sink;
mod sink;

pub use channel_sink::{ChannelSink, TowerEvent};
pub use log_sink::LogSink;
pub use sink::{FanOutSink, NullSink, StatusSink, SystemStatus};
