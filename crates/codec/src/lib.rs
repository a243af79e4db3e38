//! Portable text codecs for archived record collections
//!
//! Two renderings of the same rows live inside every archive:
//!
//! - [`tabular`] — the quote-aware delimited form the importer reads back.
//!   Decoding coerces cells to typed [`Field`] values (null, boolean,
//!   integer, decimal, text); encoding is the inverse.
//! - [`sql`] — an INSERT-statement rendering kept for manual restores with
//!   standard database tooling. Never parsed by the pipeline.

pub mod sql;
pub mod tabular;

pub use sql::render_insert_statements;
pub use tabular::{decode, encode, CodecError, CodecResult, Field, Table};
