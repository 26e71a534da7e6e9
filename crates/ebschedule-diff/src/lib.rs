//! Diff engine for ebschedule.
//!
//! Turns schedule records into normalized block text and renders the
//! difference between the current and desired state as a unified diff.
//!
//! # Key Types
//!
//! - [`Document`] -- the generic tree every record is converted into
//! - [`pointer`] -- path-addressed `has`/`get`/`remove`/`set` on documents
//! - [`Normalizer`] / [`NormalizeConfig`] -- noise stripping, embedded JSON, rendering
//! - [`LineDiff`] / [`Hunk`] / [`DiffLine`] -- line-level diff of normalized text

pub mod error;
pub mod normalize;
pub mod pointer;
pub mod text;
pub mod unified;

/// A generic tree of mappings, lists and scalars. Mapping keys keep their
/// insertion order and numbers keep their original literal.
pub type Document = serde_json::Value;

pub use error::{DiffError, DiffResult};
pub use normalize::{normalize_json, to_document, Labeled, NormalizeConfig, Normalizer};
pub use unified::{diff_lines, highlight, render_unified, DiffLine, Hunk, LineDiff, NULL_DEVICE};
