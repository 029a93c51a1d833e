// ============================================
// src/games/quiz.rs
// 4択クイズ (間違えた文字は2回ずつ出し直す)
// ============================================

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::POINTS_PER_ANSWER;
use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;

/// 選択肢の最大数 (正解 + ダミー3つ)
const OPTION_COUNT: usize = 4;

/// 出題の向き
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    /// かな → ローマ字
    #[default]
    GlyphToRomanized,
    /// ローマ字 → かな
    RomanizedToGlyph,
}

impl Direction {
    /// 問題文として見せる側
    pub fn prompt(self, record: &CharacterRecord) -> &'static str {
        match self {
            Direction::GlyphToRomanized => record.glyph,
            Direction::RomanizedToGlyph => record.romanized,
        }
    }

    /// 答えとして比べる側
    pub fn answer(self, record: &CharacterRecord) -> &'static str {
        match self {
            Direction::GlyphToRomanized => record.romanized,
            Direction::RomanizedToGlyph => record.glyph,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::GlyphToRomanized => Direction::RomanizedToGlyph,
            Direction::RomanizedToGlyph => Direction::GlyphToRomanized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Asking,
    Revealed { choice: String, correct: bool },
    Complete,
}

/// 終了時の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: u32,
    /// 出し直しも含めた回答数
    pub answered: u32,
    pub correct: u32,
    pub accuracy: u32,
}

pub struct QuizScheduler<R: Rng> {
    characters: Vec<CharacterRecord>,
    direction: Direction,
    queue: Vec<CharacterRecord>,
    cursor: usize,
    mistakes: Vec<CharacterRecord>,
    options: Vec<CharacterRecord>,
    score: u32,
    answered: u32,
    phase: QuizPhase,
    rng: R,
}

impl<R: Rng> QuizScheduler<R> {
    pub fn new(characters: Vec<CharacterRecord>, direction: Direction, rng: R) -> Self {
        let mut quiz = Self {
            characters,
            direction,
            queue: Vec::new(),
            cursor: 0,
            mistakes: Vec::new(),
            options: Vec::new(),
            score: 0,
            answered: 0,
            phase: QuizPhase::Asking,
            rng,
        };
        quiz.reset();
        quiz
    }

    /// MARK:最初から。全文字をシャッフルして出題キューにする
    pub fn reset(&mut self) {
        self.queue = self.characters.clone();
        self.queue.shuffle(&mut self.rng);
        self.cursor = 0;
        self.mistakes.clear();
        self.score = 0;
        self.answered = 0;
        self.enter_asking();
    }

    /// 向きを変えるとセッションは作り直し
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.reset();
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// (何問目, キューの長さ)
    pub fn position(&self) -> (usize, usize) {
        (self.cursor + 1, self.queue.len())
    }

    pub fn mistake_queue(&self) -> &[CharacterRecord] {
        &self.mistakes
    }

    pub fn current_question(&self) -> Option<&CharacterRecord> {
        match self.phase {
            QuizPhase::Complete => None,
            _ => self.queue.get(self.cursor),
        }
    }

    pub fn expected_answer(&self) -> Option<&'static str> {
        self.current_question().map(|q| self.direction.answer(q))
    }

    /// 今の問題の選択肢 (出題中は固定)
    pub fn options(&self) -> &[CharacterRecord] {
        &self.options
    }

    /// 正解 + ローマ字が違う文字から最大3つ。足りなければ少ないまま
    pub fn build_options(&mut self, current: &CharacterRecord) -> Vec<CharacterRecord> {
        let mut distractors: Vec<CharacterRecord> = self
            .characters
            .iter()
            .filter(|c| c.romanized != current.romanized)
            .copied()
            .collect();
        distractors.shuffle(&mut self.rng);
        distractors.truncate(OPTION_COUNT - 1);

        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(*current);
        options.extend(distractors);
        options.shuffle(&mut self.rng);
        options
    }

    /// 回答。出題中以外は無視して None
    pub fn submit_answer(
        &mut self,
        choice: &str,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> Option<bool> {
        if self.phase != QuizPhase::Asking {
            return None;
        }
        let current = *self.queue.get(self.cursor)?;
        let expected = self.direction.answer(&current);
        let correct = choice == expected;
        self.answered += 1;

        if correct {
            self.score += POINTS_PER_ANSWER;
            progress.record_known(current.glyph);
            notifier.show_message("Correct! Well done!");
        } else {
            progress.record_needs_study(current.glyph);
            // 復習用に2回積む
            self.mistakes.push(current);
            self.mistakes.push(current);
            notifier.show_message(&format!("Incorrect. The answer was \"{expected}\""));
        }

        self.phase = QuizPhase::Revealed {
            choice: choice.to_string(),
            correct,
        };
        Some(correct)
    }

    /// 次の問題へ。キューが尽きたら間違いキューを出し直すか終了
    pub fn advance(&mut self, notifier: &mut dyn Notifier) -> &QuizPhase {
        if !matches!(self.phase, QuizPhase::Revealed { .. }) {
            return &self.phase;
        }

        self.cursor += 1;
        if self.cursor < self.queue.len() {
            self.enter_asking();
            return &self.phase;
        }

        if self.mistakes.is_empty() {
            info!(score = self.score, answered = self.answered, "quiz complete");
            self.phase = QuizPhase::Complete;
            self.options.clear();
            return &self.phase;
        }

        let mut retry = std::mem::take(&mut self.mistakes);
        retry.shuffle(&mut self.rng);
        debug!(count = retry.len(), "replaying missed characters");
        notifier.show_message(&format!("Practicing {} characters you missed...", retry.len()));
        self.queue = retry;
        self.cursor = 0;
        self.enter_asking();
        &self.phase
    }

    /// 終了していれば結果
    pub fn summary(&self) -> Option<QuizSummary> {
        if self.phase != QuizPhase::Complete {
            return None;
        }
        let max = self.characters.len() as f64 * POINTS_PER_ANSWER as f64;
        let accuracy = if max > 0.0 {
            ((self.score as f64 / max) * 100.0).round() as u32
        } else {
            0
        };
        Some(QuizSummary {
            score: self.score,
            answered: self.answered,
            correct: self.score / POINTS_PER_ANSWER,
            accuracy,
        })
    }

    fn enter_asking(&mut self) {
        match self.queue.get(self.cursor).copied() {
            Some(current) => {
                self.options = self.build_options(&current);
                self.phase = QuizPhase::Asking;
            }
            None => {
                // 文字が1つも無い
                self.options.clear();
                self.phase = QuizPhase::Complete;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{HIRAGANA, KATAKANA};
    use crate::notify::MessageLog;
    use crate::progress::tests::test_store;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiz(characters: &[CharacterRecord], direction: Direction) -> QuizScheduler<StdRng> {
        QuizScheduler::new(characters.to_vec(), direction, StdRng::seed_from_u64(7))
    }

    /// 正解を選んで次へ
    fn answer_correctly<R: Rng>(
        quiz: &mut QuizScheduler<R>,
        store: &mut dyn ProgressRecorder,
        log: &mut MessageLog,
    ) {
        let expected = quiz.expected_answer().unwrap();
        assert_eq!(quiz.submit_answer(expected, store, log), Some(true));
        quiz.advance(log);
    }

    #[test]
    fn queue_is_a_permutation_of_the_set() {
        let quiz = quiz(HIRAGANA, Direction::GlyphToRomanized);
        let mut glyphs: Vec<_> = quiz.queue.iter().map(|c| c.glyph).collect();
        let mut expected: Vec<_> = HIRAGANA.iter().map(|c| c.glyph).collect();
        glyphs.sort();
        expected.sort();
        assert_eq!(glyphs, expected);
    }

    #[test]
    fn same_seed_same_order() {
        let a = quiz(HIRAGANA, Direction::GlyphToRomanized);
        let b = quiz(HIRAGANA, Direction::GlyphToRomanized);
        assert_eq!(a.queue, b.queue);
        assert_eq!(a.options(), b.options());
    }

    #[test]
    fn options_hold_answer_and_distinct_distractors() {
        let quiz = quiz(HIRAGANA, Direction::GlyphToRomanized);
        let current = *quiz.current_question().unwrap();
        let options = quiz.options();
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| **o == current).count(), 1);
        for o in options.iter().filter(|o| **o != current) {
            assert_ne!(o.romanized, current.romanized);
        }
    }

    #[test]
    fn options_degrade_with_small_pool() {
        let quiz = quiz(&HIRAGANA[..2], Direction::GlyphToRomanized);
        assert_eq!(quiz.options().len(), 2);

        // ローマ字が同じ文字はダミーにならない
        let same_sound = [HIRAGANA[0], KATAKANA[0]];
        let quiz = QuizScheduler::new(
            same_sound.to_vec(),
            Direction::GlyphToRomanized,
            StdRng::seed_from_u64(1),
        );
        assert_eq!(quiz.options().len(), 1);
    }

    #[test]
    fn all_correct_completes_after_n_advances() {
        let set = &HIRAGANA[..6];
        let mut quiz = quiz(set, Direction::GlyphToRomanized);
        let mut store = test_store();
        let mut log = MessageLog::new();

        for i in 0..set.len() {
            assert_eq!(*quiz.phase(), QuizPhase::Asking, "question {i}");
            answer_correctly(&mut quiz, &mut store, &mut log);
        }
        assert_eq!(*quiz.phase(), QuizPhase::Complete);
        let summary = quiz.summary().unwrap();
        assert_eq!(summary.score, 60);
        assert_eq!(summary.accuracy, 100);
        assert_eq!(store.stats().known_count, 6);
    }

    #[test]
    fn missed_question_is_replayed_twice() {
        let set = &HIRAGANA[..5];
        let mut quiz = quiz(set, Direction::RomanizedToGlyph);
        let mut store = test_store();
        let mut log = MessageLog::new();

        // 3問目だけ間違える
        let mut missed = None;
        for k in 0..set.len() {
            if k == 2 {
                let current = *quiz.current_question().unwrap();
                assert_eq!(quiz.submit_answer("wrong", &mut store, &mut log), Some(false));
                assert_eq!(
                    log.last().unwrap(),
                    format!("Incorrect. The answer was \"{}\"", current.glyph)
                );
                missed = Some(current);
                quiz.advance(&mut log);
            } else {
                answer_correctly(&mut quiz, &mut store, &mut log);
            }
        }
        let missed = missed.unwrap();
        assert!(store.needs_study(missed.glyph));

        // 間違いキューが新しいキューになっている
        assert_eq!(log.last(), Some("Practicing 2 characters you missed..."));
        assert_eq!(quiz.position(), (1, 2));
        assert!(quiz.mistake_queue().is_empty());
        assert_eq!(quiz.current_question(), Some(&missed));

        answer_correctly(&mut quiz, &mut store, &mut log);
        assert_eq!(quiz.current_question(), Some(&missed));
        answer_correctly(&mut quiz, &mut store, &mut log);

        let summary = quiz.summary().unwrap();
        assert_eq!(summary.score, 4 * 10 + 20);
        assert_eq!(summary.answered, 7);
        assert_eq!(summary.accuracy, 120);
        assert!(store.is_known(missed.glyph));
        assert!(!store.needs_study(missed.glyph));
    }

    #[test]
    fn submit_and_advance_respect_phase() {
        let mut quiz = quiz(&HIRAGANA[..3], Direction::GlyphToRomanized);
        let mut store = test_store();
        let mut log = MessageLog::new();

        // 回答前の advance は何もしない
        quiz.advance(&mut log);
        assert_eq!(quiz.position(), (1, 3));

        quiz.submit_answer("zz", &mut store, &mut log);
        assert_eq!(quiz.submit_answer("zz", &mut store, &mut log), None);
        assert!(matches!(quiz.phase(), QuizPhase::Revealed { correct: false, .. }));
        assert_eq!(quiz.mistake_queue().len(), 2);
    }

    #[test]
    fn switching_direction_restarts() {
        let mut quiz = quiz(&HIRAGANA[..4], Direction::GlyphToRomanized);
        let mut store = test_store();
        let mut log = MessageLog::new();
        answer_correctly(&mut quiz, &mut store, &mut log);
        quiz.submit_answer("nope", &mut store, &mut log);

        quiz.set_direction(quiz.direction().toggled());
        assert_eq!(quiz.direction(), Direction::RomanizedToGlyph);
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.position(), (1, 4));
        assert!(quiz.mistake_queue().is_empty());
        assert_eq!(*quiz.phase(), QuizPhase::Asking);
    }

    #[test]
    fn empty_set_is_complete() {
        let quiz = quiz(&[], Direction::GlyphToRomanized);
        assert_eq!(*quiz.phase(), QuizPhase::Complete);
        assert_eq!(quiz.summary().unwrap().accuracy, 0);
    }
}
