//! Common test utilities for dcr scenario tests.
//!
//! - `FakeRemote`: an in-process SSH host backed by a temp directory
//! - Fixtures: key files, source trees, profiles and a recording sink

#![allow(dead_code)]

pub mod fake_remote;
pub mod fixtures;

pub use fake_remote::*;
pub use fixtures::*;
