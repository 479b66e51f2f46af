//! interface-notifier: interface address change notifications
//!
//! A library for comparing a host's interface addresses against the
//! snapshot saved by the previous run and notifying Slack and email
//! receivers about watched interfaces whose addresses changed.

pub mod config;
pub mod detect;
pub mod network;
pub mod notify;
pub mod pipeline;
pub mod state;
pub mod time;
