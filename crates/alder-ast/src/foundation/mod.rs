//! Foundation types shared across the compiler.
//!
//! Everything here is a plain value type with no knowledge of the node
//! model: source locations, dotted identifier paths, and the write-once /
//! seal-once primitives the resolution engine's monotonicity rests on.

pub mod once;
pub mod path;
pub mod seal;
pub mod span;

pub use once::OnceRef;
pub use path::{DotPath, Identifier};
pub use seal::{SealableList, SealableMap};
pub use span::{SourceFile, SourceMap, Span};
