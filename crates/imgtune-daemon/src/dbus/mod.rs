//! D-Bus interface for the imgtune daemon.
//!
//! Provides the `org.imgtune.Daemon1` interface.

mod interface;

pub use interface::run_dbus_server;
