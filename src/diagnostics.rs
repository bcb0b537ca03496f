//! Read-only views of the zero page and of process page tables.

use std::fmt;

use crate::constants::*;
use crate::memory::PhysicalMemory;

const MAP_COLUMNS: usize = 16;

/// Mapped `(virtual page, physical page)` pairs of `proc_num`, ascending by virtual page.
pub fn page_table_entries(pm: &PhysicalMemory, proc_num: usize) -> Vec<(u8, u8)> {
    let page_table = pm.get_page_table(proc_num);
    (0..PAGE_COUNT)
        .map(|vpage| (vpage as u8, pm.get_page_entry(page_table, vpage)))
        .filter(|&(_, page)| page != 0)
        .collect()
}

/// `#` for a used physical page, `.` for a free one, 16 per row.
pub struct FreePageMap<'a>(pub &'a PhysicalMemory);

impl fmt::Display for FreePageMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- PAGE FREE MAP ---")?;
        for page in 0..PAGE_COUNT {
            let cell = if self.0.is_page_used(page) { '#' } else { '.' };
            write!(f, "{cell}")?;
            if (page + 1) % MAP_COLUMNS == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub struct PageTableDump<'a> {
    pub pm: &'a PhysicalMemory,
    pub proc_num: usize,
}

impl fmt::Display for PageTableDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- PROCESS {} PAGE TABLE ---", self.proc_num)?;
        for (vpage, page) in page_table_entries(self.pm, self.proc_num) {
            writeln!(f, "{vpage:02x} -> {page:02x}")?;
        }
        Ok(())
    }
}
