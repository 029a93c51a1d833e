// ============================================
// src/app.rs
// アプリ全体の状態とキー入力の振り分け
// ============================================

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use kanawiz::characters::Script;
use kanawiz::config::AppConfig;
use kanawiz::games::{
    CharacterChart, Direction, FlashcardPhase, Flashcards, MemoryMatch, QuizPhase, QuizScheduler,
    StrokeOrderGame, TypingPhase, TypingTrial,
};
use kanawiz::notify::Notifier;
use kanawiz::progress::ProgressStore;
use kanawiz::speech::Speaker;
use kanawiz::storage::KeyValueStore;
use kanawiz::vocabulary::{self, CategoryFilter, VocabularyModule, VocabularyMode};

/// トーストの表示時間
const TOAST_TTL: Duration = Duration::from_secs(3);
/// 神経衰弱の1行のカード数
pub const MEMORY_COLUMNS: usize = 4;

/// 上部のタブ
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tab {
    Script(Script),
    Vocabulary,
    Progress,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Script(Script::Hiragana),
        Tab::Script(Script::Katakana),
        Tab::Vocabulary,
        Tab::Progress,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Script(script) => script.label(),
            Tab::Vocabulary => "Vocabulary",
            Tab::Progress => "Progress",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// 文字タブの中の学習モード
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Chart,
    Flashcard,
    Memory,
    Typing,
    Stroke,
    Quiz,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Chart,
        Mode::Flashcard,
        Mode::Memory,
        Mode::Typing,
        Mode::Stroke,
        Mode::Quiz,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Chart => "Character Chart",
            Mode::Flashcard => "Flashcards",
            Mode::Memory => "Memory Game",
            Mode::Typing => "Speed Typing",
            Mode::Stroke => "Stroke Order",
            Mode::Quiz => "Multiple Choice",
        }
    }

    fn from_function_key(n: u8) -> Option<Self> {
        Mode::ALL.get(n.checked_sub(1)? as usize).copied()
    }
}

/// 今遊んでいるゲーム
pub enum Session {
    Chart(CharacterChart),
    Flashcards(Flashcards),
    Memory(MemoryMatch<StdRng>),
    Typing(TypingTrial<StdRng>),
    Stroke(StrokeOrderGame<StdRng>),
    Quiz(QuizScheduler<StdRng>),
}

impl Session {
    /// 文字種かモードが変わるたびに作り直す
    fn build(mode: Mode, script: Script, config: &AppConfig) -> Self {
        let characters = script.characters().to_vec();
        let rng = StdRng::from_os_rng();
        match mode {
            Mode::Chart => Session::Chart(CharacterChart::new(characters)),
            Mode::Flashcard => {
                Session::Flashcards(Flashcards::new(characters, config.flashcard_advance()))
            }
            Mode::Memory => Session::Memory(MemoryMatch::new(
                &characters,
                config.memory_pairs,
                config.match_check_delay(),
                rng,
            )),
            Mode::Typing => Session::Typing(TypingTrial::new(
                characters,
                config.typing_duration_secs,
                config.tick(),
                rng,
            )),
            Mode::Stroke => {
                Session::Stroke(StrokeOrderGame::new(characters, config.stroke_advance(), rng))
            }
            Mode::Quiz => {
                Session::Quiz(QuizScheduler::new(characters, Direction::default(), rng))
            }
        }
    }
}

/// 画面下のトースト。出すのは最新の1件だけ
#[derive(Default)]
pub struct Toast {
    message: Option<(String, Instant)>,
}

impl Toast {
    pub fn visible(&self, now: Instant) -> Option<&str> {
        let (text, shown_at) = self.message.as_ref()?;
        if now.duration_since(*shown_at) > TOAST_TTL {
            return None;
        }
        Some(text.as_str())
    }
}

impl Notifier for Toast {
    fn show_message(&mut self, text: &str) {
        debug!(message = text, "toast");
        self.message = Some((text.to_string(), Instant::now()));
    }
}

pub struct App<S: KeyValueStore> {
    pub config: AppConfig,
    pub store: ProgressStore<S>,
    pub speaker: Speaker,
    pub toast: Toast,
    pub tab: Tab,
    pub mode: Mode,
    pub session: Session,
    pub vocab: VocabularyModule,
    /// 単語一覧のスクロール位置
    pub vocab_cursor: usize,
    pub memory_cursor: usize,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(config: AppConfig, store: ProgressStore<S>, speaker: Speaker, script: Script) -> Self {
        let session = Session::build(Mode::Chart, script, &config);
        Self {
            config,
            store,
            speaker,
            toast: Toast::default(),
            tab: Tab::Script(script),
            mode: Mode::Chart,
            session,
            vocab: VocabularyModule::new(),
            vocab_cursor: 0,
            memory_cursor: 0,
            should_quit: false,
        }
    }

    /// 表示中の文字種 (文字タブ以外なら None)
    pub fn script(&self) -> Option<Script> {
        match self.tab {
            Tab::Script(script) => Some(script),
            _ => None,
        }
    }

    fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if let Tab::Script(script) = tab {
            self.rebuild(script);
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if let Some(script) = self.script() {
            self.rebuild(script);
        }
    }

    fn rebuild(&mut self, script: Script) {
        debug!(%script, mode = ?self.mode, "new session");
        self.session = Session::build(self.mode, script, &self.config);
        self.memory_cursor = 0;
    }

    /// MARK:タイマー類を進める (イベントループ毎回)
    pub fn on_tick(&mut self, now: Instant) {
        match &mut self.session {
            Session::Flashcards(cards) => {
                cards.poll(now);
            }
            Session::Memory(game) => {
                game.poll(now, &mut self.store, &mut self.toast);
            }
            Session::Typing(trial) => {
                trial.poll(now);
            }
            Session::Stroke(game) => {
                game.poll(now);
            }
            Session::Chart(_) | Session::Quiz(_) => {}
        }
    }

    /// MARK:キー入力の処理
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                let next = (self.tab.index() + 1) % Tab::ALL.len();
                self.set_tab(Tab::ALL[next]);
                return;
            }
            KeyCode::BackTab => {
                let prev = (self.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len();
                self.set_tab(Tab::ALL[prev]);
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Script(_) => self.handle_script_key(key, ctrl, now),
            Tab::Vocabulary => self.handle_vocabulary_key(key),
            Tab::Progress => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
        }
    }

    fn handle_script_key(&mut self, key: KeyEvent, ctrl: bool, now: Instant) {
        if let KeyCode::F(n) = key.code {
            if let Some(mode) = Mode::from_function_key(n) {
                self.set_mode(mode);
            }
            return;
        }
        if ctrl && key.code == KeyCode::Char('r') {
            if let Some(script) = self.script() {
                self.rebuild(script);
                self.toast.show_message("Game reset!");
            }
            return;
        }

        let store = &mut self.store;
        let toast = &mut self.toast;
        match &mut self.session {
            Session::Chart(chart) => match key.code {
                KeyCode::Left => chart.move_cursor(-1, 0),
                KeyCode::Right => chart.move_cursor(1, 0),
                KeyCode::Up => chart.move_cursor(0, -1),
                KeyCode::Down => chart.move_cursor(0, 1),
                KeyCode::Enter if chart.selected().is_some() => chart.close(),
                KeyCode::Enter => chart.open(),
                KeyCode::Char('k') => chart.mark_learned(store, toast),
                KeyCode::Char('p') => chart.play(&mut self.speaker, toast),
                KeyCode::Esc if chart.selected().is_some() => chart.close(),
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Session::Flashcards(cards) => match (cards.phase(), key.code) {
                (_, KeyCode::Esc) => self.should_quit = true,
                (FlashcardPhase::Prompt, KeyCode::Enter) => {
                    if cards.submit(store, toast).is_none() && cards.input().trim().is_empty() {
                        // 空のまま Enter は次のカード
                        cards.next(now);
                    }
                }
                (FlashcardPhase::Prompt, KeyCode::Backspace) => cards.pop_char(),
                (FlashcardPhase::Prompt, KeyCode::Char(c)) => cards.push_char(c),
                (FlashcardPhase::Revealed { .. }, KeyCode::Enter) => cards.next(now),
                (FlashcardPhase::Revealed { .. }, KeyCode::Char('k')) => {
                    cards.mark_known(now, store, toast)
                }
                (FlashcardPhase::Revealed { .. }, KeyCode::Char('s')) => {
                    cards.mark_needs_study(now, store, toast)
                }
                (FlashcardPhase::Revealed { .. }, KeyCode::Char('p')) => {
                    if let Some(card) = cards.current() {
                        self.speaker.play(card.glyph, Some(card.romanized));
                    }
                }
                _ => {}
            },
            Session::Memory(game) => {
                let total = game.cards().len().max(1);
                let cursor = &mut self.memory_cursor;
                match key.code {
                    KeyCode::Left => *cursor = cursor.saturating_sub(1),
                    KeyCode::Right => *cursor = (*cursor + 1).min(total - 1),
                    KeyCode::Up => *cursor = cursor.saturating_sub(MEMORY_COLUMNS),
                    KeyCode::Down => *cursor = (*cursor + MEMORY_COLUMNS).min(total - 1),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        game.select(*cursor, now);
                    }
                    KeyCode::Char('r') => game.reset(toast),
                    KeyCode::Esc => self.should_quit = true,
                    _ => {}
                }
            }
            Session::Typing(trial) => match (trial.phase(), key.code) {
                (_, KeyCode::Esc) => {
                    trial.stop();
                    self.should_quit = true;
                }
                (TypingPhase::Active, KeyCode::Enter) => trial.skip(store, toast),
                (TypingPhase::Active, KeyCode::Backspace) => trial.pop_char(),
                (TypingPhase::Active, KeyCode::Char(c)) => {
                    trial.push_char(c, store, toast);
                }
                (_, KeyCode::Enter) => trial.start(now),
                _ => {}
            },
            Session::Stroke(game) => match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    let slot = c as usize - '1' as usize;
                    if let Some(stroke) = game.presented().get(slot).copied() {
                        game.select_stroke(stroke.id, now, store, toast);
                    }
                }
                KeyCode::Char('s') => game.skip(toast),
                KeyCode::Enter if game.is_complete() => game.reset(),
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Session::Quiz(quiz) => match (quiz.phase().clone(), key.code) {
                (QuizPhase::Asking, KeyCode::Char(c @ '1'..='4')) => {
                    let slot = c as usize - '1' as usize;
                    let direction = quiz.direction();
                    if let Some(option) = quiz.options().get(slot).copied() {
                        quiz.submit_answer(direction.answer(&option), store, toast);
                    }
                }
                (QuizPhase::Revealed { .. }, KeyCode::Enter) => {
                    quiz.advance(toast);
                }
                (QuizPhase::Complete, KeyCode::Enter) => quiz.reset(),
                (_, KeyCode::Char('m')) => {
                    let toggled = quiz.direction().toggled();
                    quiz.set_direction(toggled);
                }
                (_, KeyCode::Esc) => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn handle_vocabulary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::F(1) => self.vocab.set_mode(VocabularyMode::Browse),
            KeyCode::F(2) => self.vocab.set_mode(VocabularyMode::Quiz),
            KeyCode::Left => self.cycle_category(-1),
            KeyCode::Right => self.cycle_category(1),
            KeyCode::Esc => self.should_quit = true,
            _ => match self.vocab.mode() {
                VocabularyMode::Browse => self.handle_browse_key(key),
                VocabularyMode::Quiz => self.handle_vocab_quiz_key(key),
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let len = self.vocab.words().len();
        match key.code {
            KeyCode::Up => self.vocab_cursor = self.vocab_cursor.saturating_sub(1),
            KeyCode::Down if len > 0 => self.vocab_cursor = (self.vocab_cursor + 1).min(len - 1),
            KeyCode::Char('p') | KeyCode::Enter => {
                if let Some(word) = self.vocab.words().get(self.vocab_cursor) {
                    self.speaker.play(word.japanese, Some(word.romanized));
                    self.toast.show_message("Playing pronunciation...");
                }
            }
            _ => {}
        }
    }

    fn handle_vocab_quiz_key(&mut self, key: KeyEvent) {
        match (self.vocab.result(), key.code) {
            (None, KeyCode::Enter) => {
                self.vocab.submit(&mut self.toast);
            }
            (None, KeyCode::Backspace) => self.vocab.pop_char(),
            (None, KeyCode::Char(c)) => self.vocab.push_char(c),
            (Some(_), KeyCode::Enter) => self.vocab.next(),
            _ => {}
        }
    }

    /// All → 各カテゴリ → All と循環
    fn cycle_category(&mut self, step: isize) {
        let mut filters = vec![CategoryFilter::All];
        filters.extend(
            vocabulary::categories()
                .into_iter()
                .map(|c| CategoryFilter::Only(c.to_string())),
        );
        let len = filters.len() as isize;
        let current = filters
            .iter()
            .position(|f| f == self.vocab.filter())
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.vocab.set_filter(filters.swap_remove(next));
        self.vocab_cursor = 0;
    }
}
