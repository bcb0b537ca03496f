//! Physical page allocation over the bitmap stored in the zero page.

use log::trace;

use crate::constants::*;
use crate::memory::PhysicalMemory;

impl PhysicalMemory {
    /// Allocate the lowest-numbered free physical page and mark it used.
    ///
    /// Returns `None` when every page is in use. Page 0 is marked used by
    /// [`PhysicalMemory::initialize`] so it is never handed out.
    pub fn allocate_page(&mut self) -> Option<u8> {
        let page = (0..PAGE_COUNT).find(|&page| !self.is_page_used(page))?;
        self.write(Self::address(0, page), 1);
        trace!("allocated physical page {page}");
        Some(page as u8)
    }

    /// Mark a physical page free.
    ///
    /// There is no double-free detection: freeing a free page, or page 0,
    /// simply clears its bitmap byte.
    pub fn free_page(&mut self, page: u8) {
        self.write(Self::address(0, page as usize), 0);
        trace!("freed physical page {page}");
    }

    #[inline]
    pub fn is_page_used(&self, page: usize) -> bool {
        self.read(Self::address(0, page)) != 0
    }

    pub fn free_page_count(&self) -> usize {
        (0..PAGE_COUNT).filter(|&page| !self.is_page_used(page)).count()
    }
}
