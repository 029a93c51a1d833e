// ============================================
// src/vocabulary.rs
// 単語データと単語クイズ
// ============================================

use crate::notify::Notifier;

/// 単語1件
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub id: &'static str,
    pub japanese: &'static str,
    pub hiragana: &'static str,
    pub romanized: &'static str,
    pub english: &'static str,
    pub category: &'static str,
}

/// 単語リスト
pub const VOCABULARY: &[VocabularyEntry] = &[
    VocabularyEntry {
        id: "greeting-1",
        japanese: "おはよう",
        hiragana: "おはよう",
        romanized: "ohayou",
        english: "good morning (informal)",
        category: "greetings",
    },
    VocabularyEntry {
        id: "greeting-2",
        japanese: "こんにちは",
        hiragana: "こんにちは",
        romanized: "konnichiwa",
        english: "hello/good afternoon",
        category: "greetings",
    },
    VocabularyEntry {
        id: "greeting-3",
        japanese: "こんばんは",
        hiragana: "こんばんは",
        romanized: "konbanwa",
        english: "good evening",
        category: "greetings",
    },
    VocabularyEntry {
        id: "greeting-4",
        japanese: "さようなら",
        hiragana: "さようなら",
        romanized: "sayounara",
        english: "goodbye",
        category: "greetings",
    },
    VocabularyEntry {
        id: "greeting-5",
        japanese: "ありがとう",
        hiragana: "ありがとう",
        romanized: "arigatou",
        english: "thank you",
        category: "greetings",
    },
    VocabularyEntry {
        id: "family-1",
        japanese: "おかあさん",
        hiragana: "おかあさん",
        romanized: "okaasan",
        english: "mother",
        category: "family",
    },
    VocabularyEntry {
        id: "family-2",
        japanese: "おとうさん",
        hiragana: "おとうさん",
        romanized: "otousan",
        english: "father",
        category: "family",
    },
    VocabularyEntry {
        id: "family-3",
        japanese: "おにいさん",
        hiragana: "おにいさん",
        romanized: "oniisan",
        english: "older brother",
        category: "family",
    },
    VocabularyEntry {
        id: "family-4",
        japanese: "おねえさん",
        hiragana: "おねえさん",
        romanized: "oneesan",
        english: "older sister",
        category: "family",
    },
    VocabularyEntry {
        id: "food-1",
        japanese: "すし",
        hiragana: "すし",
        romanized: "sushi",
        english: "sushi",
        category: "food",
    },
    VocabularyEntry {
        id: "food-2",
        japanese: "みず",
        hiragana: "みず",
        romanized: "mizu",
        english: "water",
        category: "food",
    },
    VocabularyEntry {
        id: "food-3",
        japanese: "おちゃ",
        hiragana: "おちゃ",
        romanized: "ocha",
        english: "tea",
        category: "food",
    },
    VocabularyEntry {
        id: "food-4",
        japanese: "ごはん",
        hiragana: "ごはん",
        romanized: "gohan",
        english: "rice/meal",
        category: "food",
    },
    VocabularyEntry {
        id: "basic-1",
        japanese: "ねこ",
        hiragana: "ねこ",
        romanized: "neko",
        english: "cat",
        category: "animals",
    },
    VocabularyEntry {
        id: "basic-2",
        japanese: "いぬ",
        hiragana: "いぬ",
        romanized: "inu",
        english: "dog",
        category: "animals",
    },
    VocabularyEntry {
        id: "basic-3",
        japanese: "ほん",
        hiragana: "ほん",
        romanized: "hon",
        english: "book",
        category: "objects",
    },
    VocabularyEntry {
        id: "basic-4",
        japanese: "がっこう",
        hiragana: "がっこう",
        romanized: "gakkou",
        english: "school",
        category: "places",
    },
    VocabularyEntry {
        id: "basic-5",
        japanese: "いえ",
        hiragana: "いえ",
        romanized: "ie",
        english: "house",
        category: "places",
    },
];

/// カテゴリ一覧 (登場順、重複なし)
pub fn categories() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for entry in VOCABULARY {
        if !out.contains(&entry.category) {
            out.push(entry.category);
        }
    }
    out
}

/// 指定カテゴリの単語だけ
pub fn by_category(category: &str) -> Vec<&'static VocabularyEntry> {
    VOCABULARY.iter().filter(|e| e.category == category).collect()
}

/// 表示する単語の絞り込み
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn entries(&self) -> Vec<&'static VocabularyEntry> {
        match self {
            CategoryFilter::All => VOCABULARY.iter().collect(),
            CategoryFilter::Only(category) => by_category(category),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VocabularyMode {
    #[default]
    Browse,
    Quiz,
}

/// 単語モジュールの状態 (一覧 / クイズ)
#[derive(Debug, Default)]
pub struct VocabularyModule {
    filter: CategoryFilter,
    mode: VocabularyMode,
    words: Vec<&'static VocabularyEntry>,
    quiz_index: usize,
    answer: String,
    /// 採点済みなら Some(正誤)
    result: Option<bool>,
}

impl VocabularyModule {
    pub fn new() -> Self {
        Self {
            words: CategoryFilter::All.entries(),
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn mode(&self) -> VocabularyMode {
        self.mode
    }

    pub fn words(&self) -> &[&'static VocabularyEntry] {
        &self.words
    }

    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn result(&self) -> Option<bool> {
        self.result
    }

    /// 今出題中の単語。絞り込み結果が空なら None
    pub fn current(&self) -> Option<&'static VocabularyEntry> {
        self.words.get(self.quiz_index).copied()
    }

    /// カテゴリを変えるとクイズは最初から
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.words = filter.entries();
        self.filter = filter;
        self.clear_quiz();
    }

    pub fn set_mode(&mut self, mode: VocabularyMode) {
        self.mode = mode;
        self.clear_quiz();
    }

    pub fn push_char(&mut self, c: char) {
        if self.result.is_none() {
            self.answer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.result.is_none() {
            self.answer.pop();
        }
    }

    /// 英訳を答え合わせ。空入力や採点済みの時は何もしない
    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> Option<bool> {
        if self.result.is_some() || self.answer.trim().is_empty() {
            return None;
        }
        let word = self.current()?;
        let correct = self.answer.trim().to_lowercase() == word.english.to_lowercase();
        self.result = Some(correct);
        if correct {
            notifier.show_message("Correct! Well done!");
        } else {
            notifier.show_message(&format!("Incorrect. The answer is \"{}\"", word.english));
        }
        Some(correct)
    }

    /// 次の単語へ (末尾で先頭に戻る)
    pub fn next(&mut self) {
        self.answer.clear();
        self.result = None;
        if !self.words.is_empty() {
            self.quiz_index = (self.quiz_index + 1) % self.words.len();
        }
    }

    fn clear_quiz(&mut self) {
        self.quiz_index = 0;
        self.answer.clear();
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MessageLog;

    #[test]
    fn categories_in_first_appearance_order() {
        assert_eq!(
            categories(),
            vec!["greetings", "family", "food", "animals", "objects", "places"]
        );
        assert_eq!(by_category("food").len(), 4);
        assert!(by_category("weather").is_empty());
    }

    #[test]
    fn quiz_accepts_trimmed_case_insensitive_answer() {
        let mut module = VocabularyModule::new();
        module.set_mode(VocabularyMode::Quiz);
        module.set_filter(CategoryFilter::Only("animals".into()));
        let mut log = MessageLog::new();

        for c in "  CAT ".chars() {
            module.push_char(c);
        }
        assert_eq!(module.submit(&mut log), Some(true));
        assert_eq!(log.last(), Some("Correct! Well done!"));

        module.next();
        for c in "wolf".chars() {
            module.push_char(c);
        }
        assert_eq!(module.submit(&mut log), Some(false));
        assert_eq!(log.last(), Some("Incorrect. The answer is \"dog\""));

        // 2件しかないので先頭に戻る
        module.next();
        assert_eq!(module.current().unwrap().english, "cat");
    }

    #[test]
    fn changing_filter_resets_quiz() {
        let mut module = VocabularyModule::new();
        module.next();
        module.next();
        module.push_char('x');
        module.set_filter(CategoryFilter::Only("places".into()));
        assert_eq!(module.quiz_index(), 0);
        assert_eq!(module.answer(), "");
        assert_eq!(module.words().len(), 2);
    }

    #[test]
    fn empty_filter_is_harmless() {
        let mut module = VocabularyModule::new();
        module.set_filter(CategoryFilter::Only("weather".into()));
        let mut log = MessageLog::new();
        module.push_char('a');
        assert_eq!(module.submit(&mut log), None);
        module.next();
        assert!(module.current().is_none());
        assert!(log.messages().is_empty());
    }
}
