//! Test harness for colony authoring.
//!
//! Scripts multi-step colony builds against either kernel and checks the
//! result at every step.
//!
//! # Key Components
//!
//! - [`ColonyBuilder`]: Fluent API over a session and a kernel, with named curves
//! - [`report`]: Structured text colony descriptions
//! - [`helpers`]: Error type, curve builders, configs
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use report::ColonyReport;
pub use workflow::ColonyBuilder;
