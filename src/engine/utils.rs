use crate::types::Vec2;

pub(super) fn manhattan(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Strictly closer than `range` on both axes.
pub(super) fn is_within_range(a: Vec2, b: Vec2, range: i32) -> bool {
    (a.x - b.x).abs() < range && (a.y - b.y).abs() < range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_sums_axis_distances() {
        assert_eq!(manhattan(Vec2::new(1, 1), Vec2::new(4, 5)), 7);
        assert_eq!(manhattan(Vec2::new(4, 5), Vec2::new(1, 1)), 7);
        assert_eq!(manhattan(Vec2::new(3, 3), Vec2::new(3, 3)), 0);
    }

    #[test]
    fn range_is_exclusive_on_each_axis() {
        let origin = Vec2::new(10, 10);
        assert!(is_within_range(origin, Vec2::new(12, 8), 3));
        assert!(!is_within_range(origin, Vec2::new(13, 10), 3));
        assert!(!is_within_range(origin, Vec2::new(10, 7), 3));
        assert!(is_within_range(origin, origin, 3));
    }
}
