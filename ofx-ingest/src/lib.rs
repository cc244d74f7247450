//! ofx-ingest: reads OFX 1.0.2 documents (header block + SGML body) into
//! `ofx-core` records.

pub mod document;
pub mod header;
pub mod parser;
pub mod tag_tree;

pub use document::{SUPPORTED_VERSIONS, split_document};
pub use header::{Headers, parse_headers};
pub use parser::Ofx102Parser;
pub use tag_tree::{HtmlTagTree, TagTree};
