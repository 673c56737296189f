//! Response consumption: NDJSON framing and event dispatch.

pub mod consumer;
pub mod framer;

pub use consumer::{
    ChunkStream, Outcome, Reply, ResponseConsumer, ResponseMode, consume, consume_document,
};
pub use framer::RecordFramer;
