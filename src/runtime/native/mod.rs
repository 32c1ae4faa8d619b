//! Native runtime: in-memory page model and image probe.

mod memory;
mod probe;

pub use memory::{MemoryDocument, MemoryElement};
pub use probe::ImageProbe;
