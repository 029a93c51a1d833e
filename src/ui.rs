// ============================================
// src/ui.rs
// UI描画
// ============================================

use std::time::Instant;

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
};

use kanawiz::characters::Script;
use kanawiz::dashboard;
use kanawiz::games::{
    CardFace, CharacterChart, Direction as QuizDirection, FlashcardPhase, Flashcards, MemoryMatch, QuizPhase,
    QuizScheduler, StrokeOrderGame, TypingPhase, TypingTrial, chart,
};
use kanawiz::progress::ProgressStats;
use kanawiz::storage::KeyValueStore;
use kanawiz::vocabulary::{CategoryFilter, VocabularyMode};
use rand::Rng;

use crate::app::{App, MEMORY_COLUMNS, Mode, Session, Tab};

pub fn ui<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default().borders(Borders::ALL).title("Kana Wiz !");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] タブ
            Constraint::Length(1), // [1] モード / 操作説明
            Constraint::Min(1),    // [2] 本体
            Constraint::Length(1), // [3] トースト
        ])
        .split(inner_area);

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    f.render_widget(
        Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::default().fg(Color::Magenta).bold()),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(help_line(app)).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    match app.tab {
        Tab::Script(script) => draw_session(f, app, script, chunks[2]),
        Tab::Vocabulary => draw_vocabulary(f, app, chunks[2]),
        Tab::Progress => draw_progress(f, app, chunks[2]),
    }

    if let Some(text) = app.toast.visible(Instant::now()) {
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .centered(),
            chunks[3],
        );
    }
}

fn help_line<S: KeyValueStore>(app: &App<S>) -> Line<'static> {
    match app.tab {
        Tab::Script(_) => {
            let mut spans = Vec::new();
            for (i, mode) in Mode::ALL.iter().enumerate() {
                let style = if *mode == app.mode {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                spans.push(Span::styled(format!(" F{} {} ", i + 1, mode.label()), style));
            }
            Line::from(spans)
        }
        Tab::Vocabulary => Line::from(" F1 Browse  F2 Quiz  ←/→ Category  Tab Next tab  Esc Quit"),
        Tab::Progress => Line::from(" Tab Next tab  Esc Quit"),
    }
}

fn draw_session<S: KeyValueStore>(f: &mut Frame, app: &App<S>, script: Script, area: Rect) {
    match &app.session {
        Session::Chart(chart) => draw_chart(f, app, chart, area),
        Session::Flashcards(cards) => draw_flashcards(f, cards, area),
        Session::Memory(game) => draw_memory(f, game, app.memory_cursor, area),
        Session::Typing(trial) => draw_typing(f, trial, area),
        Session::Stroke(game) => draw_stroke(f, game, area),
        Session::Quiz(quiz) => draw_quiz(f, quiz, script, area),
    }
}

// --------------------------------------------------
// 五十音表
// --------------------------------------------------

fn draw_chart<S: KeyValueStore>(f: &mut Frame, app: &App<S>, chart: &CharacterChart, area: Rect) {
    let mut lines = Vec::new();
    for (row_idx, row) in chart.characters().chunks(chart::COLUMNS).enumerate() {
        let mut spans = Vec::new();
        for (col, record) in row.iter().enumerate() {
            let idx = row_idx * chart::COLUMNS + col;
            let mut style = if app.store.is_known(record.glyph) {
                Style::default().fg(Color::Green)
            } else if app.store.needs_study(record.glyph) {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            if idx == chart.cursor() {
                style = style.bg(Color::DarkGray).bold();
            }
            spans.push(Span::styled(format!(" {} {:<4}", record.glyph, record.romanized), style));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    match chart.selected() {
        Some(record) => {
            lines.push(Line::from(format!("{}  ({})", record.glyph, record.romanized)).bold());
            lines.push(Line::from(record.mnemonic).fg(Color::Gray));
            lines.push(Line::from(format!(
                "Practiced {} times   [k] mark learned  [p] play  [Enter] close",
                app.store.practice_count(record.glyph)
            )));
        }
        None => lines.push(Line::from("Arrows move  Enter details  p play").fg(Color::DarkGray)),
    }
    f.render_widget(Paragraph::new(lines).centered(), area);
}

// --------------------------------------------------
// フラッシュカード
// --------------------------------------------------

fn draw_flashcards(f: &mut Frame, cards: &Flashcards, area: Rect) {
    let Some(card) = cards.current() else {
        return;
    };
    let (pos, total) = cards.position();
    let mut lines = vec![
        Line::from(format!("Card {pos} of {total}")).fg(Color::Gray),
        Line::from(""),
        Line::from(card.glyph).bold(),
        Line::from(""),
    ];
    match cards.phase() {
        FlashcardPhase::Prompt => {
            lines.push(Line::from("Type the romaji pronunciation:"));
            lines.push(Line::from(format!("> {}_", cards.input())).fg(Color::Cyan));
        }
        FlashcardPhase::Revealed { correct } => {
            let (mark, color) = if correct {
                ("✓ Correct!", Color::Green)
            } else {
                ("✗ Incorrect", Color::Red)
            };
            lines.push(Line::from(mark).fg(color));
            lines.push(Line::from(card.romanized).bold());
            lines.push(Line::from(card.mnemonic).fg(Color::Gray));
            lines.push(Line::from("[k] I know this  [s] study more  [p] play  [Enter] next"));
        }
        FlashcardPhase::Advancing => {
            lines.push(Line::from(card.romanized).fg(Color::Green));
        }
    }
    let ratio = pos as f64 / total.max(1) as f64;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    f.render_widget(progress_gauge(ratio, String::new()), layout[0]);
    f.render_widget(Paragraph::new(lines).centered(), layout[1]);
}

// --------------------------------------------------
// 神経衰弱
// --------------------------------------------------

fn draw_memory<R: Rng>(f: &mut Frame, game: &MemoryMatch<R>, cursor: usize, area: Rect) {
    let mut lines = vec![
        Line::from(format!(
            "Score: {}   Pairs: {}/{}",
            game.score(),
            game.matched_pairs(),
            game.cards().len() / 2
        )),
        Line::from(""),
    ];
    for (row_idx, row) in game.cards().chunks(MEMORY_COLUMNS).enumerate() {
        let mut spans = Vec::new();
        for (col, card) in row.iter().enumerate() {
            let idx = row_idx * MEMORY_COLUMNS + col;
            let label = if card.matched { "✓".to_string() } else { card.value.to_string() };
            let mut style = match (card.matched, card.selected, card.face) {
                (true, _, _) => Style::default().fg(Color::Green),
                (_, true, _) => Style::default().fg(Color::Black).bg(Color::Cyan),
                (_, _, CardFace::Glyph) => Style::default().fg(Color::White),
                (_, _, CardFace::Romanized) => Style::default().fg(Color::Magenta),
            };
            if idx == cursor {
                style = style.underlined().bold();
            }
            spans.push(Span::styled(format!(" [{label:^4}] "), style));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    if game.is_complete() {
        lines.push(Line::from("Congratulations! Press r to play again.").fg(Color::Green));
    } else {
        lines.push(Line::from("Arrows move  Enter flip  r reset").fg(Color::DarkGray));
    }
    f.render_widget(Paragraph::new(lines).centered(), area);
}

// --------------------------------------------------
// タイムアタック
// --------------------------------------------------

fn draw_typing<R: Rng>(f: &mut Frame, trial: &TypingTrial<R>, area: Rect) {
    let lines = match trial.phase() {
        TypingPhase::Ready => vec![
            Line::from("Type the romaji for as many characters as you can.").bold(),
            Line::from("Press Enter to start").fg(Color::Gray),
        ],
        TypingPhase::Active => {
            let Some(card) = trial.current() else {
                return;
            };
            vec![
                Line::from(format!(
                    "Time: {}s   Score: {}   Streak: {}",
                    trial.time_left(),
                    trial.score(),
                    trial.streak()
                ))
                .fg(Color::Yellow),
                Line::from(""),
                Line::from(card.glyph).bold(),
                Line::from(""),
                Line::from(format!("> {}_", trial.input())).fg(Color::Cyan),
                Line::from("Press Enter to skip if you don't know").fg(Color::DarkGray),
            ]
        }
        TypingPhase::GameOver => vec![
            Line::from("Time's up!").bold(),
            Line::from(format!("Final score: {}", trial.score())),
            Line::from(format!("Accuracy: {}%", trial.accuracy())),
            Line::from(format!("Characters typed: {}", trial.total_typed())),
            Line::from(format!("Best streak: {}", trial.best_streak())),
            Line::from(format!("Characters per minute: {}", trial.chars_per_minute())),
            Line::from("Press Enter to play again").fg(Color::Gray),
        ],
    };
    f.render_widget(Paragraph::new(lines).centered(), area);
}

// --------------------------------------------------
// 書き順
// --------------------------------------------------

fn draw_stroke<R: Rng>(f: &mut Frame, game: &StrokeOrderGame<R>, area: Rect) {
    if game.is_complete() {
        let lines = vec![
            Line::from("All characters done!").bold(),
            Line::from(format!("Score: {}   Mistakes: {}", game.score(), game.attempts())),
            Line::from("Press Enter to start over").fg(Color::Gray),
        ];
        f.render_widget(Paragraph::new(lines).centered(), area);
        return;
    }
    let Some(card) = game.current() else {
        return;
    };
    let (pos, total) = game.position();
    let mut lines = vec![
        Line::from(format!(
            "Character {pos} of {total}   Score: {}   Mistakes: {}",
            game.score(),
            game.attempts()
        )),
        Line::from(""),
        Line::from(format!("{}  ({})", card.glyph, card.romanized)).bold(),
        Line::from(format!("Selected {} stroke(s)", game.selected().len())).fg(Color::Gray),
        Line::from(""),
    ];
    for (i, stroke) in game.presented().iter().enumerate() {
        let done = game.selected().contains(&stroke.id);
        let style = if done {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("[{}] {}", i + 1, stroke.description),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Pick strokes in order with 1-9  s skip").fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).centered(), area);
}

// --------------------------------------------------
// 4択クイズ
// --------------------------------------------------

fn draw_quiz<R: Rng>(f: &mut Frame, quiz: &QuizScheduler<R>, script: Script, area: Rect) {
    if let Some(summary) = quiz.summary() {
        let lines = vec![
            Line::from("Quiz Complete!").bold(),
            Line::from(format!("Total score: {}", summary.score)),
            Line::from(format!("Accuracy: {}%", summary.accuracy)),
            Line::from(format!("Questions answered: {}", summary.answered)),
            Line::from(format!("Correct answers: {}", summary.correct)),
            Line::from("Enter play again  m switch mode").fg(Color::Gray),
        ];
        f.render_widget(Paragraph::new(lines).centered(), area);
        return;
    }
    let Some(question) = quiz.current_question() else {
        return;
    };
    let direction = quiz.direction();
    let (pos, total) = quiz.position();
    let heading = match direction {
        QuizDirection::GlyphToRomanized => "What is the romaji for this character?",
        QuizDirection::RomanizedToGlyph => "Which character represents this romaji?",
    };
    let mut lines = vec![
        Line::from(format!(
            "{script}  Question {pos} of {total}   Score: {}",
            quiz.score()
        )),
        Line::from(""),
        Line::from(heading).fg(Color::Gray),
        Line::from(direction.prompt(question)).bold(),
    ];
    if direction == QuizDirection::GlyphToRomanized {
        lines.push(Line::from(question.mnemonic).fg(Color::DarkGray));
    }
    lines.push(Line::from(""));

    let revealed = match quiz.phase() {
        QuizPhase::Revealed { choice, .. } => Some(choice.as_str()),
        _ => None,
    };
    let expected = direction.answer(question);
    for (i, option) in quiz.options().iter().enumerate() {
        let value = direction.answer(option);
        let style = match revealed {
            Some(_) if value == expected => Style::default().fg(Color::Green).bold(),
            Some(choice) if choice == value => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::White),
        };
        lines.push(Line::from(Span::styled(format!("[{}] {value}", i + 1), style)));
    }
    lines.push(Line::from(""));
    let hint = if revealed.is_some() {
        "Enter next question  m switch mode"
    } else {
        "Answer with 1-4  m switch mode"
    };
    lines.push(Line::from(hint).fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).centered(), area);
}

// --------------------------------------------------
// 単語
// --------------------------------------------------

fn draw_vocabulary<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let vocab = &app.vocab;
    let category = match vocab.filter() {
        CategoryFilter::All => "All Words".to_string(),
        CategoryFilter::Only(c) => c.clone(),
    };
    let mut lines = vec![Line::from(format!("< {category} >")).bold(), Line::from("")];

    match vocab.mode() {
        VocabularyMode::Browse => {
            for (i, word) in vocab.words().iter().enumerate() {
                let style = if i == app.vocab_cursor {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("{}  {}  - {}", word.japanese, word.romanized, word.english),
                    style,
                )));
            }
        }
        VocabularyMode::Quiz => match vocab.current() {
            Some(word) => {
                lines.push(Line::from(format!(
                    "Word {} of {}",
                    vocab.quiz_index() + 1,
                    vocab.words().len()
                )));
                lines.push(Line::from(word.japanese).bold());
                lines.push(Line::from(word.romanized).fg(Color::Gray));
                lines.push(Line::from(""));
                match vocab.result() {
                    None => {
                        lines.push(Line::from("What does this mean in English?"));
                        lines.push(Line::from(format!("> {}_", vocab.answer())).fg(Color::Cyan));
                    }
                    Some(correct) => {
                        let color = if correct { Color::Green } else { Color::Red };
                        lines.push(Line::from(word.english).fg(color).bold());
                        lines.push(Line::from("Enter next word").fg(Color::DarkGray));
                    }
                }
            }
            None => lines.push(Line::from("No words in this category")),
        },
    }
    f.render_widget(Paragraph::new(lines).centered().wrap(Wrap { trim: true }), area);
}

// --------------------------------------------------
// 進捗
// --------------------------------------------------

fn draw_progress<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let stats = app.store.stats();
    let hira = app.store.stats_for(Script::Hiragana);
    let kata = app.store.stats_for(Script::Katakana);
    let (goal_count, goal_pct) = dashboard::daily_goal(&stats);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 全体
            Constraint::Length(1), // ひらがな
            Constraint::Length(1), // カタカナ
            Constraint::Length(1), // 今日の目標
            Constraint::Length(1),
            Constraint::Min(1), // 実績など
        ])
        .split(area);

    f.render_widget(
        progress_gauge(ratio(&stats), format!("Overall {}%", stats.percentage)),
        chunks[0],
    );
    f.render_widget(
        progress_gauge(ratio(&hira), format!("Hiragana {}/{}", hira.known_count, hira.total_characters)),
        chunks[1],
    );
    f.render_widget(
        progress_gauge(ratio(&kata), format!("Katakana {}/{}", kata.known_count, kata.total_characters)),
        chunks[2],
    );
    f.render_widget(
        progress_gauge(
            goal_pct as f64 / 100.0,
            format!("Daily goal {goal_count}/{}", dashboard::DAILY_GOAL),
        ),
        chunks[3],
    );

    let mut lines = vec![
        Line::from(format!(
            "Known: {}/{}   Needs study: {}   Study streak: {} days   Sessions: {}",
            stats.known_count,
            stats.total_characters,
            stats.needs_study_count,
            stats.study_streak,
            stats.total_sessions
        )),
        Line::from(""),
        Line::from("Achievements").bold(),
    ];
    for a in dashboard::achievements(&stats) {
        let (mark, color) = if a.unlocked { ("★", Color::Yellow) } else { ("☆", Color::DarkGray) };
        lines.push(Line::from(format!("{mark} {} - {}", a.title, a.description)).fg(color));
    }
    f.render_widget(Paragraph::new(lines), chunks[5]);
}

fn ratio(stats: &ProgressStats) -> f64 {
    (stats.percentage as f64 / 100.0).min(1.0)
}

fn progress_gauge(ratio: f64, label: String) -> Gauge<'static> {
    Gauge::default()
        .block(Block::default().borders(Borders::NONE))
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label)
}
