/// Move the value selection one item forward, wrapping to the first.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected % item_count + 1) % item_count
}

/// Move the value selection one item back, wrapping to the last.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    match selected % item_count {
        0 => item_count - 1,
        n => n - 1,
    }
}
