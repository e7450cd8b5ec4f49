//! Command resolution and argument binding
//!
//! Classifies what a `run` invocation asked for and splices positional
//! arguments into script command lists safely.

pub mod binder;
pub mod resolver;

pub use binder::{bind, shell_quote};
pub use resolver::{resolve, Invocation};
