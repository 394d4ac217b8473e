//! # Event-Window Analytics Engine
//!
//! This crate is the pure computational core of the system: deriving date
//! windows around an event, aligning series of different native frequencies,
//! and reducing an excess-return series to its distributional statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `StatisticsEngine` is a stateless
//!   calculator. It takes an aligned pair of series as input and produces a
//!   `RecordOutcome` as output, which makes it highly reliable and easy to
//!   test. Windows that cannot support a full statistics bundle yield an
//!   explicit no-data outcome, never an error thrown across layers.

// Declare the modules that constitute this crate.
pub mod align;
pub mod engine;
pub mod error;
pub mod growth;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use align::{align, AlignedPair, ReferenceSeries};
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use growth::compute_growth;
pub use window::EventWindow;
