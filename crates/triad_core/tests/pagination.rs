use triad_core::{clamp_page, page_index_sequence, paginate, total_pages, PageIndex};

use PageIndex::{EllipsisEnd, EllipsisStart, Page};

#[test]
fn paginate_slices_one_based_pages() {
    let items: Vec<u32> = (1..=25).collect();

    assert_eq!(paginate(&items, 10, 1), (1..=10).collect::<Vec<_>>());
    assert_eq!(paginate(&items, 10, 3), [21, 22, 23, 24, 25]);
}

#[test]
fn paginate_out_of_range_is_empty() {
    let items: Vec<u32> = (1..=25).collect();

    assert!(paginate(&items, 10, 0).is_empty());
    assert!(paginate(&items, 10, 4).is_empty());
    assert!(paginate(&items, 0, 1).is_empty());
    assert!(paginate(&items, 10, usize::MAX).is_empty());
    assert!(paginate::<u32>(&[], 10, 1).is_empty());
}

#[test]
fn clamp_keeps_requests_in_range() {
    let pages = total_pages(25, 10);
    assert_eq!(pages, 3);
    assert_eq!(clamp_page(0, pages), 1);
    assert_eq!(clamp_page(2, pages), 2);
    assert_eq!(clamp_page(99, pages), 3);
    assert_eq!(clamp_page(5, total_pages(0, 10)), 1);
}

#[test]
fn small_page_counts_are_dense() {
    assert_eq!(page_index_sequence(1, 1), [Page(1)]);
    assert_eq!(
        page_index_sequence(4, 7),
        (1..=7).map(Page).collect::<Vec<_>>()
    );
}

#[test]
fn first_page_of_ten() {
    assert_eq!(
        page_index_sequence(1, 10),
        [Page(1), Page(2), EllipsisEnd, Page(10)]
    );
}

#[test]
fn middle_page_of_ten() {
    assert_eq!(
        page_index_sequence(5, 10),
        [
            Page(1),
            EllipsisStart,
            Page(4),
            Page(5),
            Page(6),
            EllipsisEnd,
            Page(10)
        ]
    );
}

#[test]
fn last_page_of_ten() {
    assert_eq!(
        page_index_sequence(10, 10),
        [Page(1), EllipsisStart, Page(9), Page(10)]
    );
}

#[test]
fn sequence_always_brackets_current_page() {
    for total in 8..=30 {
        for current in 1..=total {
            let sequence = page_index_sequence(current, total);
            assert_eq!(sequence.first(), Some(&Page(1)));
            assert_eq!(sequence.last(), Some(&Page(total)));
            assert!(sequence.contains(&Page(current)));
            assert!(sequence.len() <= 7, "{current}/{total}: {sequence:?}");

            let numbers: Vec<usize> = sequence
                .iter()
                .filter_map(|index| match index {
                    Page(number) => Some(*number),
                    EllipsisStart | EllipsisEnd => None,
                })
                .collect();
            assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
