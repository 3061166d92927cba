//! `ghostdoc-richtext` — HTML fragment to rich-document translator.
//!
//! Generated articles arrive as small HTML fragments. This crate flattens
//! them into plain text plus non-overlapping-per-kind style ranges, and turns
//! those ranges into style operations for a document service positioned at
//! an insertion offset.
//!
//! # Quick start
//!
//! ```
//! let result = ghostdoc_richtext::parse("<p>Hello <strong>world</strong></p>").unwrap();
//! assert_eq!(result.text, "Hello world\n");
//!
//! let ops = ghostdoc_richtext::to_style_operations(&result.ranges, 1);
//! assert_eq!((ops[0].absolute_start, ops[0].absolute_end), (7, 12));
//! assert_eq!(ops[0].attributes.bold, Some(true));
//! ```

pub mod docs;
pub mod entities;
pub mod error;
pub mod export;
pub mod ops;
pub mod parse;
pub mod sanitize;
pub mod tokenize;
pub mod types;

pub use docs::{BatchUpdate, DocsRequest};
pub use error::*;
pub use export::{ExportPlan, plan_article_export, plan_transcript_export, transcript_body};
pub use ops::to_style_operations;
pub use parse::{parse, parse_bytes, parse_optional};
pub use sanitize::sanitize_llm_output;
pub use types::*;
