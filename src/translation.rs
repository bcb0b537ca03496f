use log::{debug, warn};

use crate::constants::*;
use crate::memory::PhysicalMemory;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Decompose a raw VA into virtual page and offset.
    ///
    /// # Panics
    /// If `va` lies beyond the `PAGE_COUNT` virtual pages a page table can map.
    pub fn from_raw(va: usize) -> Self {
        assert!(va < VIRTUAL_SPACE_SIZE, "virtual address {va} out of range");
        VirtualAddress {
            va,
            page: va >> PAGE_SHIFT,
            offset: va & OFFSET_MASK,
        }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}

/// Translate a virtual address of `proc_num` to a physical address.
///
/// Unmapped virtual pages are not detected: their slot holds 0, so the
/// result lands in the zero page.
pub fn translate(pm: &PhysicalMemory, proc_num: usize, va: VirtualAddress) -> usize {
    let page_table = pm.get_page_table(proc_num);
    let page = pm.get_page_entry(page_table, va.page);
    if page == 0 {
        warn!("proc {proc_num}: {va} resolves into the zero page");
    }
    let pa = PhysicalMemory::address(page as usize, va.offset);
    debug!("proc {proc_num}: {va} -> PA {pa}");
    pa
}

/// Load the byte at `va` of `proc_num`, returning the physical address and value.
pub fn load(pm: &PhysicalMemory, proc_num: usize, va: VirtualAddress) -> (usize, u8) {
    let pa = translate(pm, proc_num, va);
    (pa, pm.read(pa))
}

/// Store `value` at `va` of `proc_num`, returning the physical address written.
pub fn store(pm: &mut PhysicalMemory, proc_num: usize, va: VirtualAddress, value: u8) -> usize {
    let pa = translate(pm, proc_num, va);
    pm.write(pa, value);
    pa
}
