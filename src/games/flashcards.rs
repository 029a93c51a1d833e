// ============================================
// src/games/flashcards.rs
// フラッシュカード (順番にめくってローマ字を入力)
// ============================================

use std::time::{Duration, Instant};

use super::is_romanized_match;
use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;
use crate::timer::OneShot;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlashcardPhase {
    /// 入力待ち
    Prompt,
    /// 答え表示中
    Revealed { correct: bool },
    /// 正解後の自動送り待ち
    Advancing,
}

pub struct Flashcards {
    characters: Vec<CharacterRecord>,
    index: usize,
    input: String,
    phase: FlashcardPhase,
    advance: OneShot,
    advance_delay: Duration,
}

impl Flashcards {
    pub fn new(characters: Vec<CharacterRecord>, advance_delay: Duration) -> Self {
        Self {
            characters,
            index: 0,
            input: String::new(),
            phase: FlashcardPhase::Prompt,
            advance: OneShot::new(),
            advance_delay,
        }
    }

    pub fn current(&self) -> Option<&CharacterRecord> {
        self.characters.get(self.index)
    }

    pub fn phase(&self) -> FlashcardPhase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// (何枚目, 全枚数)
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.characters.len())
    }

    pub fn push_char(&mut self, c: char) {
        if self.phase == FlashcardPhase::Prompt {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.phase == FlashcardPhase::Prompt {
            self.input.pop();
        }
    }

    /// MARK:答え合わせ。空入力は受け付けない
    pub fn submit(
        &mut self,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> Option<bool> {
        if self.phase != FlashcardPhase::Prompt || self.input.trim().is_empty() {
            return None;
        }
        let card = *self.current()?;
        let correct = is_romanized_match(&self.input, &card);
        if correct {
            progress.record_known(card.glyph);
            notifier.show_message("Correct! Well done!");
        } else {
            progress.record_needs_study(card.glyph);
            notifier.show_message(&format!("Incorrect. The answer is \"{}\"", card.romanized));
        }
        self.phase = FlashcardPhase::Revealed { correct };
        Some(correct)
    }

    /// 自己申告「覚えた」
    pub fn mark_known(
        &mut self,
        now: Instant,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) {
        if !matches!(self.phase, FlashcardPhase::Revealed { .. }) {
            return;
        }
        if let Some(card) = self.current().copied() {
            progress.record_known(card.glyph);
            notifier.show_message("Character learned!");
        }
        self.next(now);
    }

    /// 自己申告「もう一度」
    pub fn mark_needs_study(
        &mut self,
        now: Instant,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) {
        if !matches!(self.phase, FlashcardPhase::Revealed { .. }) {
            return;
        }
        if let Some(card) = self.current().copied() {
            progress.record_needs_study(card.glyph);
            notifier.show_message("Added to study list");
        }
        self.next(now);
    }

    /// 次のカードへ。正解直後だけ少し待ってからめくる
    pub fn next(&mut self, now: Instant) {
        self.input.clear();
        match self.phase {
            FlashcardPhase::Revealed { correct: true } => {
                self.phase = FlashcardPhase::Advancing;
                self.advance.schedule(now, self.advance_delay);
            }
            FlashcardPhase::Advancing => {}
            _ => self.step(),
        }
    }

    /// 自動送りの期限が来ていればめくる
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.advance.fire(now) {
            self.step();
            return true;
        }
        false
    }

    /// 最初のカードに戻す (保留中の自動送りも捨てる)
    pub fn reset(&mut self) {
        self.advance.cancel();
        self.index = 0;
        self.input.clear();
        self.phase = FlashcardPhase::Prompt;
    }

    fn step(&mut self) {
        if !self.characters.is_empty() {
            self.index = (self.index + 1) % self.characters.len();
        }
        self.phase = FlashcardPhase::Prompt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::HIRAGANA;
    use crate::notify::MessageLog;
    use crate::progress::tests::test_store;

    const DELAY: Duration = Duration::from_millis(800);

    fn type_text(cards: &mut Flashcards, text: &str) {
        for c in text.chars() {
            cards.push_char(c);
        }
    }

    #[test]
    fn correct_answer_records_and_auto_advances() {
        let mut cards = Flashcards::new(HIRAGANA.to_vec(), DELAY);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();

        type_text(&mut cards, " A ");
        assert_eq!(cards.submit(&mut store, &mut log), Some(true));
        assert!(store.is_known("あ"));
        assert_eq!(log.last(), Some("Correct! Well done!"));

        cards.next(t0);
        assert_eq!(cards.phase(), FlashcardPhase::Advancing);
        assert!(!cards.poll(t0 + Duration::from_millis(799)));
        assert_eq!(cards.current().unwrap().glyph, "あ");
        assert!(cards.poll(t0 + DELAY));
        assert_eq!(cards.current().unwrap().glyph, "い");
        assert_eq!(cards.phase(), FlashcardPhase::Prompt);
    }

    #[test]
    fn wrong_answer_advances_immediately() {
        let mut cards = Flashcards::new(HIRAGANA.to_vec(), DELAY);
        let mut store = test_store();
        let mut log = MessageLog::new();

        type_text(&mut cards, "o");
        assert_eq!(cards.submit(&mut store, &mut log), Some(false));
        assert!(store.needs_study("あ"));
        assert_eq!(log.last(), Some("Incorrect. The answer is \"a\""));

        cards.next(Instant::now());
        assert_eq!(cards.current().unwrap().glyph, "い");
        assert_eq!(cards.input(), "");
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let mut cards = Flashcards::new(HIRAGANA.to_vec(), DELAY);
        let mut store = test_store();
        let mut log = MessageLog::new();
        type_text(&mut cards, "   ");
        assert_eq!(cards.submit(&mut store, &mut log), None);
        assert_eq!(store.practice_count("あ"), 0);
    }

    #[test]
    fn wraps_after_last_card() {
        let mut cards = Flashcards::new(HIRAGANA[..2].to_vec(), DELAY);
        let now = Instant::now();
        cards.next(now);
        cards.next(now);
        assert_eq!(cards.position(), (1, 2));
    }

    #[test]
    fn self_assessment_records_again() {
        let mut cards = Flashcards::new(HIRAGANA.to_vec(), DELAY);
        let mut store = test_store();
        let mut log = MessageLog::new();

        type_text(&mut cards, "x");
        cards.submit(&mut store, &mut log);
        cards.mark_known(Instant::now(), &mut store, &mut log);
        assert!(store.is_known("あ"));
        assert_eq!(store.practice_count("あ"), 2);
        assert_eq!(log.last(), Some("Character learned!"));
        assert_eq!(cards.current().unwrap().glyph, "い");
    }

    #[test]
    fn reset_cancels_pending_advance() {
        let mut cards = Flashcards::new(HIRAGANA.to_vec(), DELAY);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();

        type_text(&mut cards, "a");
        cards.submit(&mut store, &mut log);
        cards.next(t0);
        cards.reset();
        assert!(!cards.poll(t0 + Duration::from_secs(5)));
        assert_eq!(cards.position(), (1, 46));
    }
}
