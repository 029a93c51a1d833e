// ============================================
// src/games/stroke.rs
// 書き順ゲーム (画を正しい順番で選ぶ)
// ============================================

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use super::POINTS_PER_ANSWER;
use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;
use crate::timer::OneShot;

/// 1画ぶん
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Stroke {
    pub id: u8,
    /// 何画目か (1始まり)
    pub order: u8,
    /// SVG の path (100x100 の枠)
    pub path: &'static str,
    pub description: &'static str,
}

const fn stroke(id: u8, path: &'static str, description: &'static str) -> Stroke {
    Stroke {
        id,
        order: id,
        path,
        description,
    }
}

// 書き順データ (代表的な文字だけ)
const STROKES_A: &[Stroke] = &[
    stroke(1, "M20,30 Q30,15 35,35", "First horizontal curve"),
    stroke(2, "M15,55 Q30,45 45,55", "Bottom horizontal"),
    stroke(3, "M35,40 Q40,50 42,70", "Right vertical"),
];
const STROKES_KA: &[Stroke] = &[
    stroke(1, "M20,20 L20,70", "Left vertical"),
    stroke(2, "M20,35 L50,35", "Horizontal cross"),
    stroke(3, "M35,20 Q40,30 45,50", "Right stroke"),
];
const STROKES_SA: &[Stroke] = &[
    stroke(1, "M15,25 L50,25", "Top horizontal"),
    stroke(2, "M30,25 L30,45", "Vertical down"),
    stroke(3, "M15,55 Q32,48 50,58", "Bottom curve"),
];
const STROKES_TA: &[Stroke] = &[
    stroke(1, "M25,20 L25,45", "Left vertical"),
    stroke(2, "M15,35 L50,35", "Horizontal"),
    stroke(3, "M35,35 Q40,45 42,65", "Right hook"),
];
const STROKES_NA: &[Stroke] = &[
    stroke(1, "M20,25 L45,25", "Top horizontal"),
    stroke(2, "M32,25 L32,70", "Vertical"),
    stroke(3, "M15,45 Q25,40 35,45", "Left curve"),
    stroke(4, "M40,50 Q45,60 48,70", "Right tail"),
];
const STROKES_KATA_A: &[Stroke] = &[
    stroke(1, "M25,20 L35,70", "Left diagonal"),
    stroke(2, "M40,20 L30,70", "Right diagonal"),
    stroke(3, "M20,45 L45,45", "Horizontal cross"),
];
const STROKES_KATA_KA: &[Stroke] = &[
    stroke(1, "M20,20 L20,70", "Left vertical"),
    stroke(2, "M20,35 L50,35", "Horizontal"),
    stroke(3, "M35,20 L50,70", "Right diagonal"),
];
const STROKES_KATA_SA: &[Stroke] = &[
    stroke(1, "M15,25 L50,25", "Top horizontal"),
    stroke(2, "M15,45 L50,45", "Middle horizontal"),
    stroke(3, "M15,65 L50,65", "Bottom horizontal"),
];
/// データが無い文字用
const STROKES_GENERIC: &[Stroke] = &[
    stroke(1, "M25,30 L45,30", "Horizontal"),
    stroke(2, "M35,20 L35,60", "Vertical"),
];

/// 文字の書き順。知らない文字は汎用の2画
pub fn strokes_for(glyph: &str) -> &'static [Stroke] {
    match glyph {
        "あ" => STROKES_A,
        "か" => STROKES_KA,
        "さ" => STROKES_SA,
        "た" => STROKES_TA,
        "な" => STROKES_NA,
        "ア" => STROKES_KATA_A,
        "カ" => STROKES_KATA_KA,
        "サ" => STROKES_KATA_SA,
        _ => STROKES_GENERIC,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// 完成待ち / 終了後などで受け付けない
    Ignored,
    Correct,
    /// 最後の1画まで正しく選べた
    Finished,
    Wrong,
}

pub struct StrokeOrderGame<R: Rng> {
    characters: Vec<CharacterRecord>,
    index: usize,
    strokes: &'static [Stroke],
    /// 画面に並べる順 (シャッフル済み)
    presented: Vec<Stroke>,
    selected: Vec<u8>,
    score: u32,
    attempts: u32,
    complete: bool,
    advance: OneShot,
    advance_delay: Duration,
    rng: R,
}

impl<R: Rng> StrokeOrderGame<R> {
    pub fn new(characters: Vec<CharacterRecord>, advance_delay: Duration, rng: R) -> Self {
        let mut game = Self {
            characters,
            index: 0,
            strokes: STROKES_GENERIC,
            presented: Vec::new(),
            selected: Vec::new(),
            score: 0,
            attempts: 0,
            complete: false,
            advance: OneShot::new(),
            advance_delay,
            rng,
        };
        game.load_current();
        game
    }

    pub fn current(&self) -> Option<&CharacterRecord> {
        self.characters.get(self.index)
    }

    pub fn presented(&self) -> &[Stroke] {
        &self.presented
    }

    pub fn selected(&self) -> &[u8] {
        &self.selected
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// (何文字目, 全文字数)
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.characters.len())
    }

    /// MARK:画を選ぶ
    pub fn select_stroke(
        &mut self,
        id: u8,
        now: Instant,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> StrokeOutcome {
        if self.complete || self.advance.is_pending() {
            return StrokeOutcome::Ignored;
        }
        let Some(glyph) = self.current().map(|c| c.glyph) else {
            return StrokeOutcome::Ignored;
        };
        let Some(stroke) = self.strokes.iter().find(|s| s.id == id) else {
            return StrokeOutcome::Ignored;
        };

        let expected = self.selected.len() as u8 + 1;
        if stroke.order != expected {
            notifier.show_message("Incorrect stroke order. Try again!");
            self.selected.clear();
            self.attempts += 1;
            progress.record_needs_study(glyph);
            return StrokeOutcome::Wrong;
        }

        self.selected.push(id);
        if self.selected.len() < self.strokes.len() {
            notifier.show_message("Correct stroke!");
            return StrokeOutcome::Correct;
        }

        self.score += POINTS_PER_ANSWER;
        progress.record_known(glyph);
        notifier.show_message("Perfect! Character completed correctly!");
        self.advance.schedule(now, self.advance_delay);
        StrokeOutcome::Finished
    }

    /// 完成後の自動送り
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.advance.fire(now) {
            self.next_character();
            return true;
        }
        false
    }

    pub fn skip(&mut self, notifier: &mut dyn Notifier) {
        if self.complete {
            return;
        }
        notifier.show_message("Character skipped");
        self.advance.cancel();
        self.next_character();
    }

    pub fn reset(&mut self) {
        self.advance.cancel();
        self.index = 0;
        self.score = 0;
        self.attempts = 0;
        self.complete = false;
        self.load_current();
    }

    /// 一周したら終了
    fn next_character(&mut self) {
        if self.characters.is_empty() {
            self.complete = true;
            return;
        }
        self.index = (self.index + 1) % self.characters.len();
        if self.index == 0 {
            info!(score = self.score, attempts = self.attempts, "stroke order game complete");
            self.complete = true;
        }
        self.load_current();
    }

    fn load_current(&mut self) {
        self.selected.clear();
        self.strokes = self
            .current()
            .map(|c| strokes_for(c.glyph))
            .unwrap_or(STROKES_GENERIC);
        self.presented = self.strokes.to_vec();
        self.presented.shuffle(&mut self.rng);
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

    const DELAY: Duration = Duration::from_millis(1500);

    fn game(characters: &[CharacterRecord]) -> StrokeOrderGame<StdRng> {
        StrokeOrderGame::new(characters.to_vec(), DELAY, StdRng::seed_from_u64(11))
    }

    #[test]
    fn known_glyphs_have_ordered_tables() {
        assert_eq!(strokes_for("な").len(), 4);
        assert_eq!(strokes_for("サ").len(), 3);
        assert_eq!(strokes_for("ぬ"), STROKES_GENERIC);
        for glyph in ["あ", "か", "さ", "た", "な", "ア", "カ", "サ"] {
            for (i, s) in strokes_for(glyph).iter().enumerate() {
                assert_eq!(s.order as usize, i + 1);
            }
        }
    }

    #[test]
    fn presented_strokes_are_a_permutation() {
        let game = game(HIRAGANA);
        let mut ids: Vec<u8> = game.presented().iter().map(|s| s.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn correct_sequence_completes_character() {
        let mut game = game(HIRAGANA);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();

        assert_eq!(game.select_stroke(1, t0, &mut store, &mut log), StrokeOutcome::Correct);
        assert_eq!(log.last(), Some("Correct stroke!"));
        assert_eq!(game.select_stroke(2, t0, &mut store, &mut log), StrokeOutcome::Correct);
        assert_eq!(game.select_stroke(3, t0, &mut store, &mut log), StrokeOutcome::Finished);
        assert_eq!(game.score(), 10);
        assert!(store.is_known("あ"));

        // 自動送りまでは受け付けない
        assert_eq!(game.select_stroke(1, t0, &mut store, &mut log), StrokeOutcome::Ignored);
        assert!(!game.poll(t0 + Duration::from_millis(1499)));
        assert!(game.poll(t0 + DELAY));
        assert_eq!(game.current().unwrap().glyph, "い");
        assert!(game.selected().is_empty());
    }

    #[test]
    fn wrong_stroke_resets_selection() {
        let mut game = game(KATAKANA);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();

        game.select_stroke(1, t0, &mut store, &mut log);
        assert_eq!(game.select_stroke(3, t0, &mut store, &mut log), StrokeOutcome::Wrong);
        assert!(game.selected().is_empty());
        assert_eq!(game.attempts(), 1);
        assert!(store.needs_study("ア"));
        assert_eq!(log.last(), Some("Incorrect stroke order. Try again!"));
        assert_eq!(game.select_stroke(9, t0, &mut store, &mut log), StrokeOutcome::Ignored);
    }

    #[test]
    fn wrapping_around_completes_game() {
        let mut game = game(&HIRAGANA[..2]);
        let mut log = MessageLog::new();
        game.skip(&mut log);
        assert_eq!(log.last(), Some("Character skipped"));
        assert!(!game.is_complete());
        game.skip(&mut log);
        assert!(game.is_complete());

        game.reset();
        assert!(!game.is_complete());
        assert_eq!(game.position(), (1, 2));
    }
}
