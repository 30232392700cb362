//! Diagnostic reporting for basalt place-and-route passes.
//!
//! Long-running passes (cluster packing, LUT permutation, validity sweeps)
//! report progress and problems through a [`DiagnosticSink`] rather than
//! writing to stderr themselves; the embedding tool decides how to render
//! the accumulated [`Diagnostic`]s.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
