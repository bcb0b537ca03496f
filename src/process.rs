//! Process creation and teardown.

use log::{debug, warn};

use crate::constants::*;
use crate::error::{AllocationTarget, SimError, SimResult};
use crate::memory::PhysicalMemory;

/// Allocate a page table plus `page_count` data pages for `proc_num`.
///
/// The page-table page is zeroed before use unless it is the zero page.
/// Virtual page `i` maps to the `i`-th data page allocated. Running out of
/// memory stops creation without rollback: if the page table itself could
/// not be allocated nothing changes, otherwise the process keeps every data
/// page mapped before the failure.
///
/// # Panics
/// If `proc_num >= MAX_PROCESSES` or `page_count > PAGE_COUNT`.
pub fn create_process(pm: &mut PhysicalMemory, proc_num: usize, page_count: usize) -> SimResult<()> {
    assert!(proc_num < MAX_PROCESSES, "process {proc_num} out of range");
    assert!(page_count <= PAGE_COUNT, "page count {page_count} exceeds {PAGE_COUNT} virtual pages");

    let page_table = pm.allocate_page().ok_or(SimError::OutOfMemory {
        proc_num,
        target: AllocationTarget::PageTable,
    })?;
    if page_table == 0 {
        // Only reachable after page 0 was freed; its bytes are the bitmap.
        warn!("proc {proc_num}: page table handed the zero page, leaving it unzeroed");
    } else {
        for vpage in 0..PAGE_COUNT {
            pm.set_page_entry(page_table, vpage, 0);
        }
    }
    pm.set_page_table(proc_num, page_table);
    debug!("proc {proc_num}: page table in physical page {page_table}");

    for vpage in 0..page_count {
        let page = pm.allocate_page().ok_or(SimError::OutOfMemory {
            proc_num,
            target: AllocationTarget::DataPage { vpage },
        })?;
        pm.set_page_entry(page_table, vpage, page);
    }

    debug!("proc {proc_num}: created with {page_count} data pages");
    Ok(())
}

/// Free every data page mapped by `proc_num`, then its page table.
///
/// The process-table entry is cleared afterwards. A process that was never
/// created has page table 0, so the zero page is walked as if it were a page
/// table: each nonzero bitmap byte is taken as a page number and freed, and
/// page 0 itself is freed last.
pub fn kill_process(pm: &mut PhysicalMemory, proc_num: usize) {
    let page_table = pm.get_page_table(proc_num);
    if page_table == 0 {
        warn!("proc {proc_num} has no page table; tearing down zero page as its table");
    }

    let mut freed = 0;
    for vpage in 0..PAGE_COUNT {
        let page = pm.get_page_entry(page_table, vpage);
        if page != 0 {
            pm.free_page(page);
            freed += 1;
        }
    }
    pm.free_page(page_table);
    pm.set_page_table(proc_num, 0);

    debug!("proc {proc_num}: killed, freed {freed} data pages and page table {page_table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::page_table_entries;

    fn exhaust_all_but(pm: &mut PhysicalMemory, keep_free: usize) {
        while pm.free_page_count() > keep_free {
            pm.allocate_page();
        }
    }

    #[test]
    fn test_create_process_maps_pages_in_order() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 3, 2).unwrap();

        assert_eq!(pm.get_page_table(3), 1);
        assert_eq!(page_table_entries(&pm, 3), vec![(0, 2), (1, 3)]);
        assert_eq!(pm.free_page_count(), PAGE_COUNT - 4);
    }

    #[test]
    fn test_create_process_with_no_data_pages() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 0).unwrap();

        assert_eq!(pm.get_page_table(0), 1);
        assert!(page_table_entries(&pm, 0).is_empty());
    }

    #[test]
    fn test_two_processes_do_not_share_pages() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2).unwrap();
        create_process(&mut pm, 2, 2).unwrap();

        assert_eq!(page_table_entries(&pm, 1), vec![(0, 2), (1, 3)]);
        assert_eq!(pm.get_page_table(2), 4);
        assert_eq!(page_table_entries(&pm, 2), vec![(0, 5), (1, 6)]);
    }

    #[test]
    fn test_page_table_oom_leaves_no_state() {
        let mut pm = PhysicalMemory::new();
        exhaust_all_but(&mut pm, 0);

        let err = create_process(&mut pm, 4, 1).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfMemory {
                proc_num: 4,
                target: AllocationTarget::PageTable
            }
        );
        assert_eq!(pm.get_page_table(4), 0);
    }

    #[test]
    fn test_partial_failure_keeps_allocated_pages() {
        let mut pm = PhysicalMemory::new();
        // Page table plus one data page fit, the other two do not.
        exhaust_all_but(&mut pm, 2);

        let err = create_process(&mut pm, 5, 3).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfMemory {
                proc_num: 5,
                target: AllocationTarget::DataPage { vpage: 1 }
            }
        );

        let page_table = pm.get_page_table(5);
        assert_ne!(page_table, 0);
        let entries = page_table_entries(&pm, 5);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, 0);
        assert_eq!(pm.get_page_entry(page_table, 1), 0);
        assert_eq!(pm.get_page_entry(page_table, 2), 0);
        assert_eq!(pm.free_page_count(), 0);
    }

    #[test]
    fn test_single_free_page_goes_to_page_table() {
        let mut pm = PhysicalMemory::new();
        exhaust_all_but(&mut pm, 1);

        let err = create_process(&mut pm, 5, 3).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfMemory {
                proc_num: 5,
                target: AllocationTarget::DataPage { vpage: 0 }
            }
        );
        assert_eq!(pm.get_page_table(5), 63);
        assert!(page_table_entries(&pm, 5).is_empty());
        assert_eq!(pm.free_page_count(), 0);
    }

    #[test]
    fn test_kill_process_reclaims_everything() {
        let mut pm = PhysicalMemory::new();
        let initial_free = pm.free_page_count();

        create_process(&mut pm, 7, 4).unwrap();
        assert_eq!(pm.free_page_count(), initial_free - 5);

        kill_process(&mut pm, 7);
        assert_eq!(pm.free_page_count(), initial_free);
        assert_eq!(pm.get_page_table(7), 0);
    }

    #[test]
    fn test_kill_partial_process() {
        let mut pm = PhysicalMemory::new();
        exhaust_all_but(&mut pm, 2);
        let _ = create_process(&mut pm, 5, 3);

        kill_process(&mut pm, 5);
        assert_eq!(pm.free_page_count(), 2);
    }

    #[test]
    fn test_recycled_page_table_has_no_stale_entries() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 3).unwrap();
        kill_process(&mut pm, 1);

        create_process(&mut pm, 2, 1).unwrap();
        assert_eq!(pm.get_page_table(2), 1);
        assert_eq!(page_table_entries(&pm, 2), vec![(0, 2)]);
    }

    #[test]
    fn test_kill_frees_only_that_process() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2).unwrap();
        create_process(&mut pm, 2, 2).unwrap();

        kill_process(&mut pm, 1);

        assert_eq!(page_table_entries(&pm, 2), vec![(0, 5), (1, 6)]);
        assert!((4..=6).all(|page| pm.is_page_used(page)));
        assert!((1..=3).all(|page| !pm.is_page_used(page)));
        assert_eq!(pm.allocate_page(), Some(1));
    }

    #[test]
    fn test_kill_never_created_process_frees_zero_page() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2).unwrap();

        kill_process(&mut pm, 9);

        // Bitmap bytes read as page numbers are all 1, so page 1 is freed
        // repeatedly, then the "page table" page 0 goes too.
        assert!(!pm.is_page_used(0));
        assert!(!pm.is_page_used(1));
        assert!(pm.is_page_used(2));
        assert!(pm.is_page_used(3));
        assert_eq!(pm.free_page_count(), PAGE_COUNT - 2);
        assert_eq!(pm.allocate_page(), Some(0));
    }

    #[test]
    fn test_create_after_zero_page_freed_keeps_bitmap() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 4).unwrap();
        kill_process(&mut pm, 9);
        // Pages 0 and 1 are free again; proc 1 still owns data pages 2..=5.

        create_process(&mut pm, 2, 3).unwrap();

        assert_eq!(pm.get_page_table(2), 0);
        assert_eq!(page_table_entries(&pm, 1), vec![(0, 2), (1, 3), (2, 4), (3, 5)]);
        assert!((2..=5).all(|page| pm.is_page_used(page)));
        // Proc 2's mappings overwrite bitmap bytes 0..3 with nonzero values,
        // so proc 1's data pages are never handed out again.
        assert_eq!(pm.get_page_entry(0, 0), 1);
        assert_eq!(pm.get_page_entry(0, 1), 6);
        assert_eq!(pm.get_page_entry(0, 2), 7);
        assert_eq!(pm.allocate_page(), Some(8));
    }

    #[test]
    fn test_killed_process_has_no_table() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 4, 2).unwrap();
        kill_process(&mut pm, 4);

        assert_eq!(pm.get_page_table(4), 0);
        // The old table page is left as-is until it is reused.
        assert_eq!(pm.get_page_entry(1, 0), 2);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_create_rejects_oversized_process() {
        let mut pm = PhysicalMemory::new();
        let _ = create_process(&mut pm, 1, PAGE_COUNT + 1);
    }
}
