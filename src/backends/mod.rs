//! Device backends for `padmap`.
//!
//! Implementations of [`Device`](crate::device::Device) that can be plugged
//! into [`DeviceSlots`](crate::device::DeviceSlots).
//!
//! The crate does not poll OS input APIs itself; the host application owns the
//! event loop and supplies its own [`DeviceSource`](crate::device::DeviceSource).
//! The virtual backend is always available for tests, demos and replay.

pub mod virtual_input;
