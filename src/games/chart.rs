// ============================================
// src/games/chart.rs
// 五十音表 (詳細表示 / 覚えた印 / 読み上げ)
// ============================================

use crate::characters::CharacterRecord;
use crate::notify::Notifier;
use crate::progress::ProgressRecorder;
use crate::speech::Speaker;

/// 表の1行あたりの列数
pub const COLUMNS: usize = 5;

pub struct CharacterChart {
    characters: Vec<CharacterRecord>,
    cursor: usize,
    /// 詳細を開いている文字
    open: Option<usize>,
}

impl CharacterChart {
    pub fn new(characters: Vec<CharacterRecord>) -> Self {
        Self {
            characters,
            cursor: 0,
            open: None,
        }
    }

    pub fn characters(&self) -> &[CharacterRecord] {
        &self.characters
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&CharacterRecord> {
        self.open.and_then(|i| self.characters.get(i))
    }

    /// カーソル移動 (表の端で止まる)
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        if self.characters.is_empty() {
            return;
        }
        let delta = dx + dy * COLUMNS as isize;
        let last = self.characters.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn open(&mut self) {
        if self.cursor < self.characters.len() {
            self.open = Some(self.cursor);
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn mark_learned(&mut self, progress: &mut dyn ProgressRecorder, notifier: &mut dyn Notifier) {
        let Some(record) = self.selected().copied() else {
            return;
        };
        progress.record_known(record.glyph);
        notifier.show_message("Character marked as learned!");
        self.close();
    }

    /// カーソル位置の文字を読み上げる
    pub fn play(&self, speaker: &mut Speaker, notifier: &mut dyn Notifier) {
        let Some(record) = self.characters.get(self.cursor) else {
            return;
        };
        speaker.play(record.glyph, Some(record.romanized));
        notifier.show_message("Playing pronunciation...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::HIRAGANA;
    use crate::notify::MessageLog;
    use crate::progress::tests::test_store;
    use crate::speech::SilentSynth;

    #[test]
    fn cursor_moves_by_rows_and_clamps() {
        let mut chart = CharacterChart::new(HIRAGANA.to_vec());
        chart.move_cursor(0, 1);
        assert_eq!(chart.cursor(), 5);
        chart.move_cursor(-10, 0);
        assert_eq!(chart.cursor(), 0);
        chart.move_cursor(0, 100);
        assert_eq!(chart.cursor(), 45);
    }

    #[test]
    fn mark_learned_records_and_closes() {
        let mut chart = CharacterChart::new(HIRAGANA.to_vec());
        let mut store = test_store();
        let mut log = MessageLog::new();

        // 詳細を開いていない時は何もしない
        chart.mark_learned(&mut store, &mut log);
        assert_eq!(store.stats().known_count, 0);

        chart.move_cursor(1, 0);
        chart.open();
        assert_eq!(chart.selected().unwrap().glyph, "い");
        chart.mark_learned(&mut store, &mut log);
        assert!(store.is_known("い"));
        assert!(chart.selected().is_none());
        assert_eq!(log.last(), Some("Character marked as learned!"));
    }

    #[test]
    fn play_notifies() {
        let chart = CharacterChart::new(HIRAGANA.to_vec());
        let mut speaker = Speaker::new(Box::new(SilentSynth), 0.8, 0.7);
        let mut log = MessageLog::new();
        chart.play(&mut speaker, &mut log);
        assert_eq!(log.last(), Some("Playing pronunciation..."));
    }
}
