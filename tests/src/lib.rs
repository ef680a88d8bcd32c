//! # Media Bridge Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Scripted extension and handlers
//! └── integration/      # Page ⇄ extension flows over the event bus
//!     ├── correlation_flows.rs
//!     ├── extension_flows.rs
//!     └── presence_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mb-tests
//!
//! # By category
//! cargo test -p mb-tests integration::correlation_flows
//!
//! # Benchmarks
//! cargo bench -p mb-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

#[cfg(test)]
pub(crate) mod fixtures;
pub mod integration;
