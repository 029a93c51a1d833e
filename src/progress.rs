// ============================================
// src/progress.rs
// 学習の進行状況データと読み書きロジック
// ============================================

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::characters::Script;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// 保存先のキー (ブラウザ版の localStorage と同じ名前)
pub const STORAGE_KEY: &str = "japaneseProgress";

/// 学習者の進行状況 (保存される形そのまま)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    /// 覚えた文字
    pub known: BTreeSet<String>,
    /// 要復習の文字
    pub needs_study: BTreeSet<String>,
    pub practice_count: BTreeMap<String, u32>,
    pub last_practiced: BTreeMap<String, DateTime<Utc>>,
    pub study_streak: u32,
    pub total_sessions: u32,
}

impl ProgressState {
    /// 保存済みの JSON を読む。壊れていたら None
    pub fn from_json(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "saved progress is malformed, discarding");
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn touch(&mut self, glyph: &str, now: DateTime<Utc>) {
        *self.practice_count.entry(glyph.to_string()).or_insert(0) += 1;
        self.last_practiced.insert(glyph.to_string(), now);
    }
}

/// 集計結果 (読み取り専用)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    pub known_count: usize,
    pub total_characters: usize,
    pub percentage: u32,
    pub needs_study_count: usize,
    pub study_streak: u32,
    pub total_sessions: u32,
}

/// 分母に対する四捨五入したパーセンテージ
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// 現在時刻の取得口 (テストでは固定値にする)
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// ゲームが結果を報告する口
pub trait ProgressRecorder {
    fn record_known(&mut self, glyph: &str);
    fn record_needs_study(&mut self, glyph: &str);
}

/// 進行状況の唯一の持ち主。変更のたびに全体を保存する
pub struct ProgressStore<S: KeyValueStore, C: Clock = SystemClock> {
    state: ProgressState,
    storage: S,
    clock: C,
    /// 進捗率の分母
    total_characters: usize,
}

impl<S: KeyValueStore> ProgressStore<S, SystemClock> {
    pub fn load(storage: S, total_characters: usize) -> Self {
        Self::load_with_clock(storage, SystemClock, total_characters)
    }
}

impl<S: KeyValueStore, C: Clock> ProgressStore<S, C> {
    /// MARK:起動時に1回だけ読み込む。無い / 壊れている時はデフォルト
    pub fn load_with_clock(storage: S, clock: C, total_characters: usize) -> Self {
        let state = match storage.get(STORAGE_KEY) {
            Ok(Some(text)) => ProgressState::from_json(&text).unwrap_or_default(),
            Ok(None) => ProgressState::default(),
            Err(e) => {
                warn!(error = %e, "could not read saved progress, starting fresh");
                ProgressState::default()
            }
        };
        info!(
            known = state.known.len(),
            needs_study = state.needs_study.len(),
            "progress loaded"
        );
        Self {
            state,
            storage,
            clock,
            total_characters,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_known(&self, glyph: &str) -> bool {
        self.state.known.contains(glyph)
    }

    pub fn needs_study(&self, glyph: &str) -> bool {
        self.state.needs_study.contains(glyph)
    }

    pub fn practice_count(&self, glyph: &str) -> u32 {
        self.state.practice_count.get(glyph).copied().unwrap_or(0)
    }

    /// 覚えた。要復習リストからは外す
    pub fn record_known(&mut self, glyph: &str) {
        let now = self.clock.now();
        self.state.known.insert(glyph.to_string());
        self.state.needs_study.remove(glyph);
        self.state.touch(glyph, now);
        self.persist();
    }

    /// 要復習。覚えたリストからは外さない
    pub fn record_needs_study(&mut self, glyph: &str) {
        let now = self.clock.now();
        self.state.needs_study.insert(glyph.to_string());
        self.state.touch(glyph, now);
        self.persist();
    }

    /// 練習回数と日時だけ更新
    pub fn increment_practice_count(&mut self, glyph: &str) {
        let now = self.clock.now();
        self.state.touch(glyph, now);
        self.persist();
    }

    /// 状態をまるごと差し替える
    pub fn replace(&mut self, state: ProgressState) {
        self.state = state;
        self.persist();
    }

    pub fn reset(&mut self) {
        info!("progress reset");
        self.replace(ProgressState::default());
    }

    pub fn stats(&self) -> ProgressStats {
        let known_count = self.state.known.len();
        ProgressStats {
            known_count,
            total_characters: self.total_characters,
            percentage: percentage(known_count, self.total_characters),
            needs_study_count: self.state.needs_study.len(),
            study_streak: self.state.study_streak,
            total_sessions: self.state.total_sessions,
        }
    }

    /// 文字種ごとの集計。分母はその文字種の文字数
    pub fn stats_for(&self, script: Script) -> ProgressStats {
        let known_count = self.state.known.iter().filter(|g| script.contains(g)).count();
        let needs_study_count = self
            .state
            .needs_study
            .iter()
            .filter(|g| script.contains(g))
            .count();
        let total = script.characters().len();
        ProgressStats {
            known_count,
            total_characters: total,
            percentage: percentage(known_count, total),
            needs_study_count,
            study_streak: self.state.study_streak,
            total_sessions: self.state.total_sessions,
        }
    }

    /// 保存。失敗してもメモリ上の状態はそのまま
    pub fn save(&mut self) -> Result<()> {
        let json = self.state.to_json()?;
        self.storage.set(STORAGE_KEY, &json)?;
        debug!(bytes = json.len(), "progress saved");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "failed to save progress");
        }
    }
}

impl<S: KeyValueStore, C: Clock> ProgressRecorder for ProgressStore<S, C> {
    fn record_known(&mut self, glyph: &str) {
        ProgressStore::record_known(self, glyph);
    }

    fn record_needs_study(&mut self, glyph: &str) {
        ProgressStore::record_needs_study(self, glyph);
    }
}
