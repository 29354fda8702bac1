//! Property-based tests for the in-memory library

use mpi3_core::{Filter, Library, MemoryLibrary, OrderBy};
use proptest::prelude::*;

proptest! {
    /// Paging through a view with limit/offset yields the full list in order
    #[test]
    fn prop_pages_concatenate_to_full_list(count in 0usize..60, page_size in 1usize..10) {
        let library = MemoryLibrary::numbered(1, count);
        let filter = Filter::new();
        let full = library.get_list(&filter, OrderBy::SortableTitle, None, 0).unwrap();

        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let page = library
                .get_list(&filter, OrderBy::SortableTitle, Some(page_size), offset)
                .unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len();
            paged.extend(page);
        }

        prop_assert_eq!(paged, full);
        prop_assert_eq!(library.get_count(&filter).unwrap(), count);
    }

    /// Sortable titles contain no punctuation and no doubled spaces
    #[test]
    fn prop_sortable_title_normalized(title in "\\PC{0,40}") {
        let sortable = mpi3_core::sortable_title(&title);
        prop_assert!(sortable.chars().all(|c| c.is_alphanumeric() || c == ' '));
        prop_assert!(!sortable.contains("  "));
        prop_assert_eq!(sortable.trim(), sortable.as_str());
    }
}
