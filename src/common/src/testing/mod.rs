//! Test utilities for agentsweep.
//!
//! Builders for configurations and directory records shared by the unit and
//! integration tests of every crate.
//!
//! # Feature Flag
//!
//! This module is only available when the `testing` feature is enabled or during tests:
//!
//! ```toml
//! [dev-dependencies]
//! common = { path = "../common", features = ["testing"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use common::testing::{TestConfigBuilder, contact, identity};
//!
//! let config = TestConfigBuilder::new()
//!     .in_memory()
//!     .with_exceptions(["svc-admin"])
//!     .build();
//!
//! let bob = contact("bob", "2024-04-01").with_routing_profile("NHT-Training");
//! let bob_identity = identity("bob", "2024-05-01");
//! ```

mod config_builder;
mod fixtures;

pub use config_builder::TestConfigBuilder;
pub use fixtures::{contact, date, identity};
