//! Pixel chunking - splits the scan-ordered buffer into one range per worker.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Split `0..len` into exactly `workers` contiguous ranges.
///
/// Range `i` is `i*len/workers .. (i+1)*len/workers`, so sizes differ by at
/// most one and together they cover every index once, in order. With more
/// workers than pixels some ranges are empty.
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let t = workers.get();
    (0..t).map(|i| bound(i, len, t)..bound(i + 1, len, t)).collect()
}

// Widened so `i * len` cannot overflow on large images.
fn bound(i: usize, len: usize, t: usize) -> usize {
    (i as u128 * len as u128 / t as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn assert_exact_cover(ranges: &[Range<usize>], len: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next, "ranges must be contiguous: {ranges:?}");
            assert!(r.start <= r.end);
            next = r.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn test_covers_exactly_once() {
        for len in 1..=64 {
            for t in 1..=12 {
                let ranges = partition(len, nz(t));
                assert_eq!(ranges.len(), t);
                assert_exact_cover(&ranges, len);
            }
        }
    }

    #[test]
    fn test_sizes_differ_by_at_most_one() {
        for (len, t) in [(10, 4), (7, 3), (1000, 7), (5, 5), (3, 8)] {
            let sizes: Vec<usize> = partition(len, nz(t)).iter().map(|r| r.len()).collect();
            let min = *sizes.iter().min().unwrap();
            let max = *sizes.iter().max().unwrap();
            assert!(max - min <= 1, "len={len} t={t} sizes={sizes:?}");
        }
    }

    #[test]
    fn test_integer_division_bounds() {
        assert_eq!(partition(10, nz(4)), vec![0..2, 2..5, 5..7, 7..10]);
        assert_eq!(partition(2, nz(2)), vec![0..1, 1..2]);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        assert_eq!(partition(17, nz(1)), vec![0..17]);
    }

    #[test]
    fn test_more_workers_than_pixels() {
        let ranges = partition(2, nz(5));
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 3);
        assert_exact_cover(&ranges, 2);
    }

    #[test]
    fn test_empty_buffer() {
        let ranges = partition(0, nz(3));
        assert_eq!(ranges, vec![0..0, 0..0, 0..0]);
    }

    #[test]
    fn test_large_len_does_not_overflow() {
        let len = usize::MAX / 2;
        let ranges = partition(len, nz(8));
        assert_exact_cover(&ranges, len);
    }
}
