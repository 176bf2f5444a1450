//! Pure arithmetic used by the tools.

/// Add two integers.
///
/// Overflow panics in debug builds; use [`checked_add`] for untrusted input.
pub fn add(a: i64, b: i64) -> i64 {
    a + b
}

/// Add two integers, returning `None` on overflow.
pub fn checked_add(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addition() {
        assert_eq!(add(2, 3), 5);
    }

    #[test]
    fn test_addition_with_negative_numbers() {
        assert_eq!(add(-1, -4), -5);
    }

    #[test]
    fn test_addition_with_zero() {
        assert_eq!(add(0, 5), 5);
    }

    #[test]
    fn test_commutative() {
        let samples = [(0, 0), (7, -3), (-100, 42), (i64::MAX, -1), (i64::MIN, 1)];
        for (a, b) in samples {
            assert_eq!(add(a, b), add(b, a));
            assert_eq!(add(a, b), a + b);
        }
    }

    #[test]
    fn test_identity() {
        for a in [0, 1, -1, 123_456_789, i64::MAX, i64::MIN] {
            assert_eq!(add(a, 0), a);
        }
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(checked_add(2, 3), Some(5));
        assert_eq!(checked_add(i64::MAX, 1), None);
        assert_eq!(checked_add(i64::MIN, -1), None);
    }
}
