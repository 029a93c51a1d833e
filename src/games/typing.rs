// ============================================
// src/games/typing.rs
// タイムアタック (制限時間内にローマ字を打ち続ける)
// ============================================

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::info;

use super::POINTS_PER_ANSWER;
use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;
use crate::timer::Ticker;

/// 連続正解1回あたりのボーナス
const STREAK_BONUS: u32 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypingPhase {
    Ready,
    Active,
    GameOver,
}

pub struct TypingTrial<R: Rng> {
    characters: Vec<CharacterRecord>,
    current: usize,
    input: String,
    score: u32,
    /// 残り時間 (tick 単位)
    time_left: u32,
    duration: u32,
    streak: u32,
    best_streak: u32,
    correct: u32,
    /// 正解 + スキップの合計
    total_typed: u32,
    phase: TypingPhase,
    ticker: Ticker,
    rng: R,
}

impl<R: Rng> TypingTrial<R> {
    pub fn new(characters: Vec<CharacterRecord>, duration: u32, tick: Duration, rng: R) -> Self {
        Self {
            characters,
            current: 0,
            input: String::new(),
            score: 0,
            time_left: duration,
            duration,
            streak: 0,
            best_streak: 0,
            correct: 0,
            total_typed: 0,
            phase: TypingPhase::Ready,
            ticker: Ticker::new(tick),
            rng,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&CharacterRecord> {
        self.characters.get(self.current)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn total_typed(&self) -> u32 {
        self.total_typed
    }

    /// 正解率 (%)
    pub fn accuracy(&self) -> u32 {
        if self.total_typed == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total_typed as f64) * 100.0).round() as u32
    }

    /// 1分あたりの文字数
    pub fn chars_per_minute(&self) -> u32 {
        let elapsed = self.duration - self.time_left;
        if self.total_typed == 0 || elapsed == 0 {
            return 0;
        }
        ((self.total_typed as f64 / elapsed as f64) * 60.0).round() as u32
    }

    /// MARK:スタート (何度でもやり直せる)
    pub fn start(&mut self, now: Instant) {
        if self.characters.is_empty() {
            return;
        }
        self.score = 0;
        self.time_left = self.duration;
        self.streak = 0;
        self.best_streak = 0;
        self.correct = 0;
        self.total_typed = 0;
        self.input.clear();
        self.phase = TypingPhase::Active;
        self.ticker.start(now);
        self.draw();
    }

    /// イベントループから呼ぶ。時間切れになったら true
    pub fn poll(&mut self, now: Instant) -> bool {
        let ticks = self.ticker.poll(now);
        for _ in 0..ticks {
            if self.tick() {
                return true;
            }
        }
        false
    }

    /// 1tick ぶん減らす。0 になったら入力途中でも終了
    pub fn tick(&mut self) -> bool {
        if self.phase != TypingPhase::Active {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.phase = TypingPhase::GameOver;
            self.ticker.stop();
            info!(score = self.score, typed = self.total_typed, "typing trial over");
            return true;
        }
        false
    }

    /// 1文字入力。打った時点でローマ字と一致すれば正解
    pub fn push_char(
        &mut self,
        c: char,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if self.phase != TypingPhase::Active {
            return false;
        }
        self.input.extend(c.to_lowercase());
        let Some(card) = self.current().copied() else {
            return false;
        };
        if self.input != card.romanized {
            return false;
        }

        let points = POINTS_PER_ANSWER + STREAK_BONUS * self.streak;
        self.score += points;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        self.correct += 1;
        self.total_typed += 1;
        self.input.clear();
        progress.record_known(card.glyph);
        notifier.show_message(&format!(
            "Correct! +{points} points ({} streak)",
            self.streak
        ));
        self.draw();
        true
    }

    pub fn pop_char(&mut self) {
        if self.phase == TypingPhase::Active {
            self.input.pop();
        }
    }

    /// わからない時のスキップ (Enter)。連続正解はリセット
    pub fn skip(&mut self, progress: &mut dyn ProgressRecorder, notifier: &mut dyn Notifier) {
        if self.phase != TypingPhase::Active || self.input.is_empty() {
            return;
        }
        let Some(card) = self.current().copied() else {
            return;
        };
        self.streak = 0;
        self.total_typed += 1;
        self.input.clear();
        progress.record_needs_study(card.glyph);
        notifier.show_message(&format!("Incorrect! The answer was \"{}\"", card.romanized));
        self.draw();
    }

    /// 画面を閉じた時など。タイマーを止めて最初の状態へ
    pub fn stop(&mut self) {
        self.ticker.stop();
        self.input.clear();
        self.phase = TypingPhase::Ready;
        self.time_left = self.duration;
    }

    fn draw(&mut self) {
        self.current = self.rng.random_range(0..self.characters.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::HIRAGANA;
    use crate::notify::MessageLog;
    use crate::progress::tests::test_store;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TICK: Duration = Duration::from_secs(1);

    fn trial(duration: u32) -> TypingTrial<StdRng> {
        TypingTrial::new(HIRAGANA.to_vec(), duration, TICK, StdRng::seed_from_u64(42))
    }

    fn type_answer(
        trial: &mut TypingTrial<StdRng>,
        store: &mut dyn ProgressRecorder,
        log: &mut MessageLog,
    ) {
        let answer = trial.current().unwrap().romanized;
        let mut hit = false;
        for c in answer.chars() {
            hit = trial.push_char(c, store, log);
        }
        assert!(hit);
    }

    #[test]
    fn streak_bonus_grows() {
        let mut trial = trial(60);
        let mut store = test_store();
        let mut log = MessageLog::new();
        trial.start(Instant::now());

        type_answer(&mut trial, &mut store, &mut log);
        assert_eq!(trial.score(), 10);
        assert_eq!(log.last(), Some("Correct! +10 points (1 streak)"));
        type_answer(&mut trial, &mut store, &mut log);
        assert_eq!(trial.score(), 22);
        type_answer(&mut trial, &mut store, &mut log);
        assert_eq!(trial.score(), 36);
        assert_eq!(log.last(), Some("Correct! +14 points (3 streak)"));
        assert_eq!(trial.streak(), 3);
    }

    #[test]
    fn uppercase_input_still_matches() {
        let mut trial = trial(60);
        let mut store = test_store();
        let mut log = MessageLog::new();
        trial.start(Instant::now());
        let card = *trial.current().unwrap();
        let mut hit = false;
        for c in card.romanized.to_uppercase().chars() {
            hit = trial.push_char(c, &mut store, &mut log);
        }
        assert!(hit);
        assert!(store.is_known(card.glyph));
    }

    #[test]
    fn skip_resets_streak_and_records() {
        let mut trial = trial(60);
        let mut store = test_store();
        let mut log = MessageLog::new();
        trial.start(Instant::now());

        type_answer(&mut trial, &mut store, &mut log);
        // 入力が空ならスキップできない
        trial.skip(&mut store, &mut log);
        assert_eq!(trial.total_typed(), 1);

        let card = *trial.current().unwrap();
        trial.push_char('q', &mut store, &mut log);
        trial.skip(&mut store, &mut log);
        assert_eq!(trial.streak(), 0);
        assert_eq!(trial.best_streak(), 1);
        assert_eq!(trial.total_typed(), 2);
        assert_eq!(trial.accuracy(), 50);
        assert!(store.needs_study(card.glyph));
        assert_eq!(
            log.last().unwrap(),
            format!("Incorrect! The answer was \"{}\"", card.romanized)
        );
    }

    #[test]
    fn countdown_forces_game_over() {
        let mut trial = trial(3);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();
        trial.start(t0);

        assert!(!trial.poll(t0 + TICK));
        assert_eq!(trial.time_left(), 2);
        trial.push_char('z', &mut store, &mut log);
        assert!(trial.poll(t0 + TICK * 5));
        assert_eq!(trial.phase(), TypingPhase::GameOver);
        assert_eq!(trial.time_left(), 0);

        // 終了後の入力は無視
        assert!(!trial.push_char('a', &mut store, &mut log));
        assert!(!trial.poll(t0 + TICK * 10));
    }

    #[test]
    fn chars_per_minute_uses_elapsed_time() {
        let mut trial = trial(60);
        let mut store = test_store();
        let mut log = MessageLog::new();
        trial.start(Instant::now());
        for _ in 0..3 {
            type_answer(&mut trial, &mut store, &mut log);
        }
        assert_eq!(trial.chars_per_minute(), 0);
        for _ in 0..30 {
            trial.tick();
        }
        assert_eq!(trial.chars_per_minute(), 6);
        assert_eq!(trial.accuracy(), 100);
    }

    #[test]
    fn restart_clears_counters() {
        let mut trial = trial(2);
        let mut store = test_store();
        let mut log = MessageLog::new();
        let t0 = Instant::now();
        trial.start(t0);
        type_answer(&mut trial, &mut store, &mut log);
        trial.tick();
        trial.tick();
        assert_eq!(trial.phase(), TypingPhase::GameOver);

        trial.start(t0);
        assert_eq!(trial.score(), 0);
        assert_eq!(trial.time_left(), 2);
        assert_eq!(trial.phase(), TypingPhase::Active);
    }
}
