use crate::constants::*;

/// Simulated RAM: `PAGE_COUNT` pages of `PAGE_SIZE` bytes.
///
/// Page 0 is the zero page. Its first `PAGE_COUNT` bytes are the free-page
/// bitmap and the bytes from `PROCESS_TABLE_BASE` on are the process table.
/// Both live inside the same buffer as process data and follow the same
/// addressing rules.
pub struct PhysicalMemory {
    data: Box<[u8; MEM_SIZE]>,
}

impl PhysicalMemory {
    /// Create a physical memory that is already initialized.
    pub fn new() -> Self {
        let mut pm = PhysicalMemory {
            data: Box::new([0u8; MEM_SIZE]),
        };
        pm.initialize();
        pm
    }

    /// Zero every byte, then mark page 0 as used.
    pub fn initialize(&mut self) {
        self.data.fill(0);
        self.data[0] = 1;
    }

    /// Pack a page and an offset into a linear address.
    ///
    /// # Panics
    /// If `page >= PAGE_COUNT` or `offset >= PAGE_SIZE`.
    #[inline]
    pub fn address(page: usize, offset: usize) -> usize {
        assert!(page < PAGE_COUNT, "physical page {page} out of range");
        assert!(offset < PAGE_SIZE, "page offset {offset} out of range");
        (page << PAGE_SHIFT) | offset
    }

    /// Read a byte from physical memory
    #[inline]
    pub fn read(&self, address: usize) -> u8 {
        self.data[address]
    }

    /// Write a byte to physical memory
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        self.data[address] = value;
    }

    /// Get a Page Table entry
    #[inline]
    pub fn get_page_entry(&self, page_table: u8, vpage: usize) -> u8 {
        self.read(Self::address(page_table as usize, vpage))
    }

    /// Set a Page Table entry
    pub fn set_page_entry(&mut self, page_table: u8, vpage: usize, page: u8) {
        self.write(Self::address(page_table as usize, vpage), page);
    }

    /// Physical page holding the page table of `proc_num`, 0 if none was recorded.
    #[inline]
    pub fn get_page_table(&self, proc_num: usize) -> u8 {
        self.read(Self::process_slot(proc_num))
    }

    pub fn set_page_table(&mut self, proc_num: usize, page_table: u8) {
        self.write(Self::process_slot(proc_num), page_table);
    }

    fn process_slot(proc_num: usize) -> usize {
        assert!(proc_num < MAX_PROCESSES, "process {proc_num} out of range");
        Self::address(0, PROCESS_TABLE_BASE + proc_num)
    }

    /// Borrow the bytes of one physical page.
    pub fn page(&self, page: usize) -> &[u8] {
        let start = Self::address(page, 0);
        &self.data[start..start + PAGE_SIZE]
    }

    /// Get direct access to the underlying data
    pub fn data(&self) -> &[u8; MEM_SIZE] {
        &self.data
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new()
    }
}
