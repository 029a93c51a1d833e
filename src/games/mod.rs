// ============================================
// src/games/mod.rs
// 学習モード (それぞれ小さな状態機械)
// ============================================

pub mod chart;
pub mod flashcards;
pub mod memory;
pub mod quiz;
pub mod stroke;
pub mod typing;

pub use chart::CharacterChart;
pub use flashcards::{FlashcardPhase, Flashcards};
pub use memory::{Card, CardFace, MatchResult, MemoryMatch, SelectOutcome};
pub use quiz::{Direction, QuizPhase, QuizScheduler, QuizSummary};
pub use stroke::{Stroke, StrokeOrderGame, StrokeOutcome, strokes_for};
pub use typing::{TypingPhase, TypingTrial};

use crate::characters::CharacterRecord;

/// 1問正解あたりの得点
pub const POINTS_PER_ANSWER: u32 = 10;

/// 自由入力の答え合わせ (前後の空白を無視、大文字小文字を区別しない)
pub fn is_romanized_match(input: &str, record: &CharacterRecord) -> bool {
    input.trim().to_lowercase() == record.romanized.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Script;

    #[test]
    fn answer_check_ignores_case_and_whitespace() {
        let shi = Script::Hiragana.by_glyph("し").unwrap();
        assert!(is_romanized_match(" SHI\t", shi));
        assert!(!is_romanized_match("si", shi));
        assert!(!is_romanized_match("", shi));
    }
}
