//! Scoring module - line-clear points, leveling and gravity speed
//!
//! - Points per lock come from [`LINE_CLEAR_POINTS`], multiplied by the level
//!   the lines were cleared at. Counts above four score as four.
//! - Level is `lines / 10 + 1`.
//! - Gravity starts at 1000ms per row and speeds up 50ms per level down to a
//!   100ms floor.

use crate::types::{
    BASE_FALL_MS, FALL_STEP_MS, LINES_PER_LEVEL, LINE_CLEAR_POINTS, MIN_FALL_MS,
};

/// Points awarded for clearing `lines` rows in one lock at `level`
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    let index = (lines as usize).min(LINE_CLEAR_POINTS.len() - 1);
    LINE_CLEAR_POINTS[index].saturating_mul(level)
}

/// Level reached after clearing `total_lines` rows
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval in milliseconds for a level (1-based)
pub fn fall_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(FALL_STEP_MS);
    BASE_FALL_MS.saturating_sub(speedup).max(MIN_FALL_MS)
}

/// Letter grade shown next to a final score
pub fn grade(score: u32) -> &'static str {
    match score {
        10_000.. => "S",
        7_500.. => "A",
        5_000.. => "B",
        2_500.. => "C",
        1_000.. => "D",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_points_table() {
        assert_eq!(line_clear_points(0, 1), 0);
        assert_eq!(line_clear_points(1, 1), 100);
        assert_eq!(line_clear_points(2, 1), 300);
        assert_eq!(line_clear_points(3, 1), 500);
        assert_eq!(line_clear_points(4, 1), 800);
    }

    #[test]
    fn test_line_clear_points_scale_with_level() {
        assert_eq!(line_clear_points(2, 3), 900);
        assert_eq!(line_clear_points(4, 1), 800);
        assert_eq!(line_clear_points(1, 7), 700);
    }

    #[test]
    fn test_more_than_four_lines_score_as_four() {
        assert_eq!(line_clear_points(5, 1), 800);
        assert_eq!(line_clear_points(20, 2), 1600);
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(level_for_lines(100), 11);
    }

    #[test]
    fn test_fall_interval() {
        assert_eq!(fall_interval_ms(1), 1000);
        assert_eq!(fall_interval_ms(2), 950);
        assert_eq!(fall_interval_ms(10), 550);
        assert_eq!(fall_interval_ms(19), 100);
        assert_eq!(fall_interval_ms(11), 500);
        assert_eq!(fall_interval_ms(100), 100);
        assert_eq!(fall_interval_ms(500), 100);
        assert_eq!(fall_interval_ms(level_for_lines(180)), 100);
        assert_eq!(fall_interval_ms(0), 1000);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade(0), "F");
        assert_eq!(grade(999), "F");
        assert_eq!(grade(1_000), "D");
        assert_eq!(grade(2_500), "C");
        assert_eq!(grade(5_000), "B");
        assert_eq!(grade(7_499), "B");
        assert_eq!(grade(7_500), "A");
        assert_eq!(grade(10_000), "S");
    }
}
