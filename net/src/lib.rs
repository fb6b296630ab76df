//! Frame distribution over TCP.
//!
//! Each captured frame is republished to every connected subscriber as a
//! `u64 little-endian length prefix` followed by the serialized frame. The
//! protocol carries nothing else; a subscriber reads exactly the announced
//! length, parses, and waits for the next header.

pub mod broadcast;
pub mod subscribe;
pub mod wire;

pub use broadcast::FrameBroadcastServer;
pub use subscribe::FrameSubscriber;
pub use wire::{encode_frame, read_frame, WireError, MAX_PAYLOAD_LEN};
