pub mod allocator;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod memory;
pub mod process;
pub mod simulator;
pub mod translation;

pub use constants::*;
pub use error::{AllocationTarget, ParseError, SimError};
pub use memory::PhysicalMemory;
pub use simulator::Simulator;
pub use translation::VirtualAddress;
