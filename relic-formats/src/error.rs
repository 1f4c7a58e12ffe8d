//! Error taxonomy and the advisory warning channel.
//!
//! Fatal conditions abort the whole parse/export call and surface as
//! [`Error`]. Non-fatal anomalies (trailing data, dangling name references)
//! are collected into [`ParseWarning`]s and returned alongside the complete
//! result; a file that parses with warnings is still usable.

use std::fmt;

use thiserror::Error;

use crate::model::GameProfile;

/// Fatal errors for a single parse or export call.
///
/// There is no partial result: any of these aborts the file operation and the
/// caller must fix the input and re-run. Parsing is deterministic, so retries
/// belong to the I/O layer above, not here.
#[derive(Debug, Error)]
pub enum Error {
    /// Leading version token is outside the supported set for the profile.
    /// Raised before any entity is decoded.
    #[error("unsupported model version {version} ({profile} supports {lo}..={hi})")]
    UnsupportedVersion {
        version: i64,
        profile: GameProfile,
        lo: u32,
        hi: u32,
    },

    /// A read ran past end-of-stream.
    #[error("unexpected end of stream while reading {context}")]
    UnexpectedEof { context: &'static str },

    /// A token could not be parsed as a number even after the legacy
    /// truncation fallback.
    #[error("malformed numeric token `{token}`")]
    BadNumber { token: String },

    /// A declared count/length is inconsistent with the remaining data.
    #[error("declared count {count} for {what} exceeds remaining input")]
    BadCount { what: &'static str, count: i64 },

    /// Nested blocks exceeded the decoder's recursion limit. Well-formed
    /// files nest three levels deep, so anything near the limit is a
    /// crafted or corrupt stream.
    #[error("block nesting deeper than {limit} levels")]
    DepthLimit { limit: usize },

    /// An index field points outside its target collection.
    #[error("{what} index {index} out of range (collection has {len} entries)")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },

    /// Node hierarchy reconstruction found an out-of-range, self-referential
    /// or cyclic link. Fatal: downstream consumers assume a valid tree.
    #[error("malformed node graph at node {node}: {reason}")]
    MalformedGraph { node: usize, reason: GraphFault },

    /// An export precondition did not hold ("No valid ..." channel).
    #[error("no valid {0}")]
    Precondition(String),
}

/// What exactly went wrong inside the node graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFault {
    ParentOutOfRange,
    SelfParent,
    ChildOutOfRange,
    SiblingOutOfRange,
    CycleDetected,
    Unreachable,
}

impl fmt::Display for GraphFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GraphFault::ParentOutOfRange => "parent index out of range",
            GraphFault::SelfParent => "node is its own parent",
            GraphFault::ChildOutOfRange => "child index out of range",
            GraphFault::SiblingOutOfRange => "sibling index out of range",
            GraphFault::CycleDetected => "cyclic parent/sibling chain",
            GraphFault::Unreachable => "node unreachable from any root",
        };
        f.write_str(s)
    }
}

/// Non-fatal anomalies collected during a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Tokens/bytes were left unconsumed after the declared structure.
    /// Signals a reader/writer mismatch worth investigating.
    TrailingData { remaining: usize },

    /// A by-name reference did not resolve against its target collection.
    MissingReference {
        kind: &'static str,
        name: String,
        collection: &'static str,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::TrailingData { remaining } => {
                write!(f, "{remaining} elements left after parse")
            }
            ParseWarning::MissingReference {
                kind,
                name,
                collection,
            } => {
                write!(f, "{kind} '{name}' not found in {collection}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_data_message() {
        let w = ParseWarning::TrailingData { remaining: 3 };
        assert_eq!(w.to_string(), "3 elements left after parse");
    }

    #[test]
    fn test_missing_reference_message() {
        let w = ParseWarning::MissingReference {
            kind: "Material",
            name: "hull".to_string(),
            collection: "regions",
        };
        assert_eq!(w.to_string(), "Material 'hull' not found in regions");
    }

    #[test]
    fn test_unsupported_version_message() {
        let e = Error::UnsupportedVersion {
            version: 9999,
            profile: GameProfile::Classic,
            lo: 8197,
            hi: 8200,
        };
        let msg = e.to_string();
        assert!(msg.contains("9999"));
        assert!(msg.contains("8197"));
        assert!(msg.contains("8200"));
    }
}
