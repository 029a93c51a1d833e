// ============================================
// src/games/memory.rs
// 神経衰弱 (かなカードとローマ字カードを揃える)
// ============================================

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;

use super::POINTS_PER_ANSWER;
use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;
use crate::timer::OneShot;

/// 同時にめくれる枚数
const MAX_SELECTED: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CardFace {
    Glyph,
    Romanized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub face: CardFace,
    /// 盤面の文字リスト上の位置
    pub record: usize,
    pub value: &'static str,
    pub matched: bool,
    pub selected: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Rejected,
    /// 1枚目
    Selected,
    /// 2枚目。判定待ちに入った
    Checking,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Match,
    NoMatch,
}

pub struct MemoryMatch<R: Rng> {
    records: Vec<CharacterRecord>,
    cards: Vec<Card>,
    selected: Vec<usize>,
    checking: OneShot,
    check_delay: Duration,
    score: u32,
    rng: R,
}

impl<R: Rng> MemoryMatch<R> {
    /// 先頭 `pairs` 文字で盤面を作る
    pub fn new(characters: &[CharacterRecord], pairs: usize, check_delay: Duration, rng: R) -> Self {
        let records = characters.iter().take(pairs).copied().collect();
        let mut game = Self {
            records,
            cards: Vec::new(),
            selected: Vec::new(),
            checking: OneShot::new(),
            check_delay,
            score: 0,
            rng,
        };
        game.deal();
        game
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_checking(&self) -> bool {
        self.checking.is_pending()
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    /// MARK:カードを選ぶ
    pub fn select(&mut self, index: usize, now: Instant) -> SelectOutcome {
        if self.is_checking() || self.selected.len() >= MAX_SELECTED {
            return SelectOutcome::Rejected;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return SelectOutcome::Rejected;
        };
        if card.matched || card.selected {
            return SelectOutcome::Rejected;
        }
        card.selected = true;
        self.selected.push(index);

        if self.selected.len() == MAX_SELECTED {
            self.checking.schedule(now, self.check_delay);
            return SelectOutcome::Checking;
        }
        SelectOutcome::Selected
    }

    /// 判定待ちの期限が来ていれば判定する
    pub fn poll(
        &mut self,
        now: Instant,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> Option<MatchResult> {
        if !self.checking.fire(now) {
            return None;
        }
        Some(self.resolve(progress, notifier))
    }

    /// 最初から (シャッフルし直し)
    pub fn reset(&mut self, notifier: &mut dyn Notifier) {
        self.deal();
        notifier.show_message("Game reset!");
    }

    fn resolve(
        &mut self,
        progress: &mut dyn ProgressRecorder,
        notifier: &mut dyn Notifier,
    ) -> MatchResult {
        let picked = std::mem::take(&mut self.selected);
        let is_pair = match picked.as_slice() {
            [a, b] => {
                let (a, b) = (&self.cards[*a], &self.cards[*b]);
                a.face != b.face && a.record == b.record
            }
            _ => false,
        };

        for card in &mut self.cards {
            card.selected = false;
        }

        if !is_pair {
            notifier.show_message("Try again!");
            return MatchResult::NoMatch;
        }

        for &i in &picked {
            self.cards[i].matched = true;
        }
        self.score += POINTS_PER_ANSWER;
        let glyph = self.records[self.cards[picked[0]].record].glyph;
        progress.record_known(glyph);
        notifier.show_message("Great match! +10 points");
        if self.is_complete() {
            notifier.show_message("Congratulations! Game completed!");
        }
        MatchResult::Match
    }

    fn deal(&mut self) {
        self.checking.cancel();
        self.selected.clear();
        self.score = 0;
        self.cards = self
            .records
            .iter()
            .enumerate()
            .flat_map(|(i, r)| {
                [
                    Card {
                        face: CardFace::Glyph,
                        record: i,
                        value: r.glyph,
                        matched: false,
                        selected: false,
                    },
                    Card {
                        face: CardFace::Romanized,
                        record: i,
                        value: r.romanized,
                        matched: false,
                        selected: false,
                    },
                ]
            })
            .collect();
        self.cards.shuffle(&mut self.rng);
    }
}
