// ============================================
// src/dashboard.rs
// 実績と今日の目標 (進捗画面用)
// ============================================

use crate::progress::ProgressStats;

/// 1日の目標文字数
pub const DAILY_GOAL: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// 実績一覧 (解放条件は集計値から決まる)
pub fn achievements(stats: &ProgressStats) -> Vec<Achievement> {
    vec![
        Achievement {
            id: "first-steps",
            title: "First Steps",
            description: "Complete first lesson",
            unlocked: stats.known_count > 0,
        },
        Achievement {
            id: "on-fire",
            title: "On Fire",
            description: "3-day study streak",
            unlocked: stats.study_streak >= 3,
        },
        Achievement {
            id: "vowel-master",
            title: "Vowel Master",
            description: "Master all vowels",
            unlocked: stats.known_count >= 5,
        },
        Achievement {
            id: "speed-learner",
            title: "Speed Learner",
            description: "Complete 20 in a day",
            unlocked: stats.known_count >= 20,
        },
    ]
}

/// 今日の目標の進み具合 (個数, パーセント)
pub fn daily_goal(stats: &ProgressStats) -> (usize, u32) {
    let count = stats.known_count % DAILY_GOAL;
    let pct = ((count as f64 / DAILY_GOAL as f64) * 100.0).min(100.0) as u32;
    (count, pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(known_count: usize, study_streak: u32) -> ProgressStats {
        ProgressStats {
            known_count,
            total_characters: 46,
            percentage: 0,
            needs_study_count: 0,
            study_streak,
            total_sessions: 0,
        }
    }

    #[test]
    fn achievements_unlock_by_thresholds() {
        let unlocked = |s: &ProgressStats| -> Vec<&str> {
            achievements(s).into_iter().filter(|a| a.unlocked).map(|a| a.id).collect()
        };
        assert!(unlocked(&stats(0, 0)).is_empty());
        assert_eq!(unlocked(&stats(5, 0)), vec!["first-steps", "vowel-master"]);
        assert_eq!(unlocked(&stats(20, 3)).len(), 4);
    }

    #[test]
    fn daily_goal_wraps_every_ten() {
        assert_eq!(daily_goal(&stats(3, 0)), (3, 30));
        assert_eq!(daily_goal(&stats(10, 0)), (0, 0));
        assert_eq!(daily_goal(&stats(17, 0)), (7, 70));
    }
}
