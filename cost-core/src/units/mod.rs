pub mod duration;
pub mod memory;

pub use duration::{parse_hours, TimeValue};
pub use memory::{parse_gigabytes, MemoryScope, MemoryUnit};
