// ============================================
// src/config.rs
// アプリ設定 (config.json + 環境変数)
// ============================================

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{KanaError, Result};

const CONFIG_FILE: &str = "config.json";

/// 設定値。ファイルに無い項目はデフォルトで埋める
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 進捗率の分母 (全体の文字数)
    pub curriculum_size: usize,
    /// タイピングの制限時間 (秒)
    pub typing_duration_secs: u32,
    /// カウントダウンの1tickの長さ
    pub tick_ms: u64,
    /// 神経衰弱で2枚目をめくってから判定するまでの待ち
    pub match_check_delay_ms: u64,
    /// フラッシュカードで正解した後の自動送り
    pub flashcard_advance_ms: u64,
    /// 書き順ゲームで1文字完成した後の自動送り
    pub stroke_advance_ms: u64,
    pub memory_pairs: usize,
    /// 読み上げに使う外部コマンド (None なら無音)
    pub speech_command: Option<String>,
    pub speech_rate: f32,
    pub fallback_rate: f32,
    /// セーブデータの置き場所を変える場合
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            curriculum_size: 46,
            typing_duration_secs: 60,
            tick_ms: 1000,
            match_check_delay_ms: 600,
            flashcard_advance_ms: 800,
            stroke_advance_ms: 1500,
            memory_pairs: 8,
            speech_command: None,
            speech_rate: 0.8,
            fallback_rate: 0.7,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// MARK:設定ファイルのパス
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("jp", "Fukumoto0141", "KANA_WIZ")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// ファイルから読み込む。ファイルが無ければデフォルト
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| KanaError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// 起動時の読み込み。壊れていたら警告を出してデフォルトで続行
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(Path::to_path_buf).or_else(Self::default_path);
        let config = match resolved {
            Some(p) => Self::from_file(&p).unwrap_or_else(|e| {
                warn!(error = %e, "config unreadable, using defaults");
                Self::default()
            }),
            None => Self::default(),
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    /// 上書きを当ててから検証し直す。不正になったらデフォルト
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.apply_overrides(&lookup);
        if let Err(e) = self.validate() {
            warn!(error = %e, "invalid KANAWIZ_* override, using defaults");
            return Self::default();
        }
        self
    }

    /// KANAWIZ_* の値で上書き (`lookup` は環境変数の読み出し)
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(v) = parsed(lookup, "KANAWIZ_CURRICULUM_SIZE") {
            self.curriculum_size = v;
        }
        if let Some(v) = parsed(lookup, "KANAWIZ_TYPING_SECS") {
            self.typing_duration_secs = v;
        }
        if let Some(v) = parsed(lookup, "KANAWIZ_TICK_MS") {
            self.tick_ms = v;
        }
        if let Some(cmd) = lookup("KANAWIZ_SPEECH_COMMAND") {
            self.speech_command = Some(cmd);
        }
        if let Some(dir) = lookup("KANAWIZ_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn validate(&self) -> Result<()> {
        if self.curriculum_size == 0 {
            return Err(KanaError::Config("curriculum_size must be > 0".into()));
        }
        if self.tick_ms == 0 {
            return Err(KanaError::Config("tick_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn match_check_delay(&self) -> Duration {
        Duration::from_millis(self.match_check_delay_ms)
    }

    pub fn flashcard_advance(&self) -> Duration {
        Duration::from_millis(self.flashcard_advance_ms)
    }

    pub fn stroke_advance(&self) -> Duration {
        Duration::from_millis(self.stroke_advance_ms)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "typing_duration_secs": 30 }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.typing_duration_secs, 30);
        assert_eq!(config.curriculum_size, 46);
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "curriculum_size": 0 }"#).unwrap();

        assert!(matches!(AppConfig::from_file(&path), Err(KanaError::Config(_))));
    }

    fn overrides(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::default().with_overrides(overrides(&[
            ("KANAWIZ_TYPING_SECS", "30"),
            ("KANAWIZ_TICK_MS", "250"),
            ("KANAWIZ_SPEECH_COMMAND", "espeak-ng {text}"),
        ]));
        assert_eq!(config.typing_duration_secs, 30);
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.speech_command.as_deref(), Some("espeak-ng {text}"));
    }

    #[test]
    fn zero_tick_override_falls_back_to_defaults() {
        let config = AppConfig::default().with_overrides(overrides(&[("KANAWIZ_TICK_MS", "0")]));
        assert_eq!(config, AppConfig::default());

        let config =
            AppConfig::default().with_overrides(overrides(&[("KANAWIZ_CURRICULUM_SIZE", "0")]));
        assert_eq!(config.curriculum_size, 46);
    }
}
