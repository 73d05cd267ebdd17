//! 百分比与三档分类
//!
//! 所有报表共用这一对阈值，"需要关注"的学生即红色档（低于 40%）。

use crate::models::feedback::entities::RagStatus;

/// 达到该百分比为绿色
pub const GREEN_THRESHOLD: u8 = 70;
/// 达到该百分比为黄色，低于为红色
pub const AMBER_THRESHOLD: u8 = 40;

/// 按固定阈值分类
pub fn classify(percentage: u8) -> RagStatus {
    if percentage >= GREEN_THRESHOLD {
        RagStatus::Green
    } else if percentage >= AMBER_THRESHOLD {
        RagStatus::Amber
    } else {
        RagStatus::Red
    }
}

/// 分数按千分之一分换算成整数后再取整，避免浮点误差把 57.5 这类值舍到下一档
const MARK_SCALE: f64 = 1000.0;

fn scaled_marks(marks: f64) -> i128 {
    (marks * MARK_SCALE).round() as i128
}

/// `round(100 * awarded / available)`，四舍五入到整数并限制在 0..=100
///
/// `available` 不足千分之一分时没有意义，返回 `None`。
pub fn percentage(awarded: f64, available: f64) -> Option<u8> {
    if !awarded.is_finite() || !available.is_finite() {
        return None;
    }
    let available = scaled_marks(available);
    if available <= 0 {
        return None;
    }
    let awarded = scaled_marks(awarded).clamp(0, available);
    // floor((200a + v) / 2v) 即 100a/v 四舍五入
    let rounded = (200 * awarded + available) / (2 * available);
    u8::try_from(rounded).ok()
}

/// 整数百分比的平均值，四舍五入
pub(crate) fn mean_percentage(values: &[u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let count = values.len() as u32;
    u8::try_from((2 * total + count) / (2 * count)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(100), RagStatus::Green);
        assert_eq!(classify(70), RagStatus::Green);
        assert_eq!(classify(69), RagStatus::Amber);
        assert_eq!(classify(40), RagStatus::Amber);
        assert_eq!(classify(39), RagStatus::Red);
        assert_eq!(classify(0), RagStatus::Red);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(139.0, 200.0), Some(70));
        assert_eq!(percentage(79.0, 200.0), Some(40));
        assert_eq!(percentage(1.0, 3.0), Some(33));
        assert_eq!(percentage(2.0, 3.0), Some(67));
        assert_eq!(percentage(0.0, 5.0), Some(0));
        assert_eq!(percentage(5.0, 5.0), Some(100));
    }

    #[test]
    fn test_percentage_half_marks_round_up() {
        // 2.3 / 4 = 57.5%，5.1 / 12 = 42.5%，8.7 / 12 = 72.5%
        assert_eq!(percentage(2.3, 4.0), Some(58));
        assert_eq!(percentage(5.1, 12.0), Some(43));
        assert_eq!(percentage(8.7, 12.0), Some(73));
        assert_eq!(percentage(0.1 + 0.2, 0.4), Some(75));
    }

    #[test]
    fn test_percentage_matches_exact_rounding_on_tenths() {
        for available_tenths in 1..=1000_i64 {
            for awarded_tenths in 0..=available_tenths {
                let expected = (200 * awarded_tenths + available_tenths) / (2 * available_tenths);
                let got = percentage(
                    awarded_tenths as f64 / 10.0,
                    available_tenths as f64 / 10.0,
                );
                assert_eq!(
                    got,
                    Some(expected as u8),
                    "{awarded_tenths}/{available_tenths} tenths"
                );
            }
        }
    }

    #[test]
    fn test_percentage_without_available_marks() {
        assert_eq!(percentage(0.0, 0.0), None);
        assert_eq!(percentage(3.0, -1.0), None);
        assert_eq!(percentage(1.0, f64::NAN), None);
        assert_eq!(percentage(0.0, 0.0001), None);
    }

    #[test]
    fn test_percentage_is_clamped() {
        assert_eq!(percentage(12.0, 10.0), Some(100));
        assert_eq!(percentage(-2.0, 10.0), Some(0));
    }

    #[test]
    fn test_mean_percentage() {
        assert_eq!(mean_percentage(&[]), None);
        assert_eq!(mean_percentage(&[90, 30]), Some(60));
        assert_eq!(mean_percentage(&[50, 51]), Some(51));
        assert_eq!(mean_percentage(&[33, 33, 34]), Some(33));
    }
}
