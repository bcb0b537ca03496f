pub const PAGE_SHIFT: u32 = 8;

pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
pub const PAGE_COUNT: usize = 64;
pub const MEM_SIZE: usize = 16384;

const _: () = assert!(MEM_SIZE == PAGE_SIZE * PAGE_COUNT);

pub const OFFSET_MASK: usize = PAGE_SIZE - 1;

/// Zero page holds the free-page bitmap in bytes `0..PAGE_COUNT`, followed by
/// the process table (one page-table pointer per process).
pub const PROCESS_TABLE_BASE: usize = PAGE_COUNT;
pub const MAX_PROCESSES: usize = PAGE_SIZE - PROCESS_TABLE_BASE;

/// Largest virtual address covered by a single-level page table (exclusive).
pub const VIRTUAL_SPACE_SIZE: usize = PAGE_COUNT * PAGE_SIZE;

/// Byte-level "no free page" marker.
pub const OUT_OF_MEMORY: u8 = 0xFF;
