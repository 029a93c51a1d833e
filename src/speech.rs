// ============================================
// src/speech.rs
// 読み上げ (外部の音声合成に投げっぱなし)
// ============================================

use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{KanaError, Result};

pub const JAPANESE_LOCALE: &str = "ja-JP";
pub const ENGLISH_LOCALE: &str = "en-US";

/// 読み上げ1回ぶん
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: &'static str,
    pub rate: f32,
}

/// 音声合成の口。結果は待たない
pub trait SpeechSynth {
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// 失敗したら `fallback` を読む。後から失敗が分かる実装は上書きする
    fn speak_or(&mut self, utterance: &Utterance, fallback: &Utterance) -> Result<()> {
        if let Err(e) = self.speak(utterance) {
            debug!(error = %e, "speech synthesis error, falling back");
            return self.speak(fallback);
        }
        Ok(())
    }
}

/// 何もしない
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSynth;

impl SpeechSynth for SilentSynth {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        debug!(text = %utterance.text, "speech disabled");
        Ok(())
    }
}

/// 外部コマンドを起動する。`{text}` `{locale}` `{rate}` を置き換える
/// 例: `espeak-ng -v {locale} {text}`
#[derive(Debug, Clone)]
pub struct CommandSynth {
    template: Vec<String>,
}

impl CommandSynth {
    pub fn new(template: &str) -> Result<Self> {
        let template: Vec<String> = template.split_whitespace().map(str::to_string).collect();
        if template.is_empty() {
            return Err(KanaError::Config("speech_command is empty".into()));
        }
        Ok(Self { template })
    }

    fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let rate = utterance.rate.to_string();
        self.template
            .iter()
            .map(|part| {
                part.replace("{text}", &utterance.text)
                    .replace("{locale}", utterance.locale)
                    .replace("{rate}", &rate)
            })
            .collect()
    }
}

impl SpeechSynth for CommandSynth {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        let mut child = spawn(&self.args_for(utterance))?;
        // 終了待ちは別スレッドで (ゾンビを残さない)
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }

    /// 起動できても異常終了したら (声が無い等) 別スレッドで代わりを読む
    fn speak_or(&mut self, utterance: &Utterance, fallback: &Utterance) -> Result<()> {
        let primary = self.args_for(utterance);
        let fallback = self.args_for(fallback);
        let child = match spawn(&primary) {
            Ok(child) => child,
            Err(e) => {
                debug!(error = %e, "speech synthesis error, falling back");
                let mut child = spawn(&fallback)?;
                thread::spawn(move || {
                    let _ = child.wait();
                });
                return Ok(());
            }
        };
        thread::spawn(move || {
            wait_or_fallback(child, &fallback);
        });
        Ok(())
    }
}

fn spawn(args: &[String]) -> Result<Child> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| KanaError::Speech("empty command".into()))?;
    Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| KanaError::Speech(format!("{program}: {e}")))
}

/// 終了を待ち、失敗していれば `fallback` を起動して待つ。代わりを読んだら true
fn wait_or_fallback(mut child: Child, fallback: &[String]) -> bool {
    match child.wait() {
        Ok(status) if status.success() => false,
        result => {
            debug!(?result, "speech command failed, falling back to romaji");
            match spawn(fallback) {
                Ok(mut child) => {
                    let _ = child.wait();
                }
                Err(e) => debug!(error = %e, "romaji playback failed"),
            }
            true
        }
    }
}

/// 読み上げ担当。失敗は握りつぶす
pub struct Speaker {
    synth: Box<dyn SpeechSynth>,
    rate: f32,
    fallback_rate: f32,
}

impl Speaker {
    pub fn new(synth: Box<dyn SpeechSynth>, rate: f32, fallback_rate: f32) -> Self {
        Self {
            synth,
            rate,
            fallback_rate,
        }
    }

    /// 設定から作る。コマンドが無い / 不正なら無音
    pub fn from_config(config: &AppConfig) -> Self {
        let synth: Box<dyn SpeechSynth> = match config.speech_command.as_deref() {
            Some(cmd) => match CommandSynth::new(cmd) {
                Ok(synth) => Box::new(synth),
                Err(e) => {
                    warn!(error = %e, "speech disabled");
                    Box::new(SilentSynth)
                }
            },
            None => Box::new(SilentSynth),
        };
        Self::new(synth, config.speech_rate, config.fallback_rate)
    }

    /// かなを日本語で読む。失敗したらローマ字を英語で読む
    pub fn play(&mut self, glyph: &str, romanized: Option<&str>) {
        let utterance = Utterance {
            text: glyph.to_string(),
            locale: JAPANESE_LOCALE,
            rate: self.rate,
        };
        let result = match romanized {
            Some(romanized) => {
                let fallback = self.romaji(romanized);
                self.synth.speak_or(&utterance, &fallback)
            }
            None => self.synth.speak(&utterance),
        };
        if let Err(e) = result {
            debug!(error = %e, "speech playback failed");
        }
    }

    pub fn play_romaji(&mut self, romanized: &str) {
        let utterance = self.romaji(romanized);
        if let Err(e) = self.synth.speak(&utterance) {
            debug!(error = %e, "romaji playback failed");
        }
    }

    fn romaji(&self, romanized: &str) -> Utterance {
        Utterance {
            text: romanized.to_string(),
            locale: ENGLISH_LOCALE,
            rate: self.fallback_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 日本語だけ失敗させる合成器
    struct Recording {
        spoken: Rc<RefCell<Vec<Utterance>>>,
        fail_japanese: bool,
    }

    impl SpeechSynth for Recording {
        fn speak(&mut self, utterance: &Utterance) -> Result<()> {
            self.spoken.borrow_mut().push(utterance.clone());
            if self.fail_japanese && utterance.locale == JAPANESE_LOCALE {
                return Err(KanaError::Speech("no voice".into()));
            }
            Ok(())
        }
    }

    fn speaker(fail_japanese: bool) -> (Speaker, Rc<RefCell<Vec<Utterance>>>) {
        let spoken = Rc::new(RefCell::new(Vec::new()));
        let synth = Recording {
            spoken: Rc::clone(&spoken),
            fail_japanese,
        };
        (Speaker::new(Box::new(synth), 0.8, 0.7), spoken)
    }

    #[test]
    fn speaks_glyph_in_japanese() {
        let (mut speaker, spoken) = speaker(false);
        speaker.play("あ", Some("a"));
        let spoken = spoken.borrow();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].locale, JAPANESE_LOCALE);
        assert_eq!(spoken[0].rate, 0.8);
    }

    #[test]
    fn falls_back_to_romaji_on_error() {
        let (mut speaker, spoken) = speaker(true);
        speaker.play("あ", Some("a"));
        let spoken = spoken.borrow();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[1].text, "a");
        assert_eq!(spoken[1].locale, ENGLISH_LOCALE);
        assert_eq!(spoken[1].rate, 0.7);
    }

    #[test]
    fn failure_without_romaji_is_silent() {
        let (mut speaker, spoken) = speaker(true);
        speaker.play("あ", None);
        assert_eq!(spoken.borrow().len(), 1);
    }

    #[test]
    fn command_template_substitutes_placeholders() {
        let synth = CommandSynth::new("say -l {locale} -r {rate} {text}").unwrap();
        let args = synth.args_for(&Utterance {
            text: "か".into(),
            locale: JAPANESE_LOCALE,
            rate: 0.8,
        });
        assert_eq!(args, vec!["say", "-l", "ja-JP", "-r", "0.8", "か"]);
        assert!(CommandSynth::new("   ").is_err());
    }

    #[test]
    fn missing_program_is_swallowed() {
        let synth = CommandSynth::new("kanawiz-no-such-tts-binary {text}").unwrap();
        let mut speaker = Speaker::new(Box::new(synth), 0.8, 0.7);
        speaker.play("あ", Some("a"));
    }

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_runs_romaji_fallback() {
        let child = spawn(&args(&["false"])).unwrap();
        assert!(wait_or_fallback(child, &args(&["true"])));

        let child = spawn(&args(&["true"])).unwrap();
        assert!(!wait_or_fallback(child, &args(&["false"])));
    }
}
