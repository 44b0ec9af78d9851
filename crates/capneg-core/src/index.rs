//! Free index allocation for locally synthesised capabilities and configurations

use std::collections::BTreeSet;

/// Pick an unused index given the indices already in use
///
/// Holes are filled first, scanning from the lowest used value upwards. A
/// contiguous run starting above 1 is extended downwards, otherwise upwards.
///
/// # Examples
///
/// ```
/// use rvoip_capneg_core::free_index;
///
/// assert_eq!(free_index([]), 1);
/// assert_eq!(free_index([1, 2, 3]), 4);
/// assert_eq!(free_index([2, 3, 4]), 1);
/// assert_eq!(free_index([1, 2, 5, 6]), 3);
/// ```
pub fn free_index(used: impl IntoIterator<Item = u32>) -> u32 {
    let used: BTreeSet<u32> = used.into_iter().collect();

    let (Some(&min), Some(&max)) = (used.first(), used.last()) else {
        return 1;
    };

    let first_hole = used
        .iter()
        .zip(used.iter().skip(1))
        .find(|(low, high)| *high - *low > 1)
        .map(|(low, _)| low + 1);

    match first_hole {
        Some(index) => index,
        None if min > 1 => min - 1,
        None => max.saturating_add(1),
    }
}
