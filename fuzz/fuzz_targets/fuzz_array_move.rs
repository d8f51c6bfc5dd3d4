#![no_main]

use dndsort_sortable::{array_move, try_array_move};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, usize, usize)| {
    let (items, from, to) = input;
    let moved = array_move(&items, from, to);
    assert_eq!(moved.len(), items.len());

    match try_array_move(&items, from, to) {
        Ok(checked) => {
            assert_eq!(checked, moved);
            assert_eq!(checked[to], items[from]);
            let mut a = checked.clone();
            let mut b = items.clone();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b, "move must be a permutation");
        }
        Err(_) => assert_eq!(moved, items, "out-of-range move must be a no-op"),
    }
});
