//! Game asset format codecs
//!
//! This crate reads and writes two asset containers:
//!
//! - [`model`] - the versioned JMF model format (revisions 8197 through
//!   8213, text and binary encodings)
//! - [`tag`] - the binary scenario tag container (nested fourcc blocks)
//!
//! Plus the supporting pieces both formats share:
//!
//! - [`cursor`] - forward-only scalar cursors and writers over text tokens
//!   and little-endian bytes
//! - [`error`] - the fatal [`Error`] taxonomy and advisory [`ParseWarning`]
//!   channel

pub mod cursor;
pub mod error;
pub mod model;
pub mod tag;

// Re-export the error channel
pub use error::{Error, GraphFault, ParseWarning};

// Re-export the model entry points and container types
pub use model::{
    node_checksum, optimize, parse_model, reconstruct_hierarchy, validate_for_export, write_model,
    GameProfile, Marker, Material, ModelAsset, ModelNode, NodeChecksumFn, NodeGraphEncoding,
    NodeInfluence, NodeTransform, ParsedModel, Region, Triangle, Vertex, WriteOptions,
    BINARY_MAGIC, NO_INDEX, VERSION_MAX, VERSION_MIN,
};

// Re-export the tag entry points and container types
pub use tag::{parse_tag, Block, BlockBody, BlockId, FourCc, ParsedTag, TagFile};
