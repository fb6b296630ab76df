//! Hands-free pointer control from head pose and winks.
//!
//! The pipeline runs one task per stage: capture feeds a latest-wins frame
//! bus and the network broadcaster, the decision stage turns detector output
//! into pointer motion and clicks, and a dedicated pointer task applies them
//! so a slow OS call never stalls detection.

pub mod actuator;
pub mod command;
pub mod config;
pub mod gesture;
pub mod logging;
pub mod pipeline;
pub mod pointer;

pub use actuator::Actuator;
pub use command::Command;
pub use config::{Config, ConfigHandle};
pub use gesture::{Eye, GestureEngine, SmoothedSignal, WinkEvent};
pub use pipeline::{DisplayPacket, Pipeline, PipelineOptions, Shutdown};
pub use pointer::{Button, Pointer, PointerAction, PointerError, TracingPointer};
