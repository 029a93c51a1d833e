// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::fs::{self, File};
use std::io::{self, Result, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

mod app;
mod ui;

use app::App;
use ui::ui;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dialoguer::Confirm;
use ratatui::prelude::*;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use kanawiz::characters::Script;
use kanawiz::config::AppConfig;
use kanawiz::dashboard;
use kanawiz::progress::{ProgressStats, ProgressStore};
use kanawiz::speech::Speaker;
use kanawiz::storage::{self, FileStore};

// --------------------------------------------------
// コマンドライン
// --------------------------------------------------

#[derive(Parser)]
#[command(name = "kanawiz", version, about = "Hiragana / katakana trainer for the terminal")]
struct Cli {
    /// 設定ファイル (省略時は OS の設定ディレクトリ)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 最初に開く文字種
    #[arg(long, value_enum, default_value_t = ScriptArg::Hiragana)]
    script: ScriptArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Copy, Clone, ValueEnum)]
enum ScriptArg {
    Hiragana,
    Katakana,
}

impl From<ScriptArg> for Script {
    fn from(arg: ScriptArg) -> Self {
        match arg {
            ScriptArg::Hiragana => Script::Hiragana,
            ScriptArg::Katakana => Script::Katakana,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// TUI で練習する (既定)
    Play,
    /// 進捗を表示して終了
    Stats,
    /// 進捗を消す
    Reset {
        /// 確認せずに消す
        #[arg(long)]
        yes: bool,
    },
}

// --------------------------------------------------
// メイン関数
// --------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());
    let data_dir = config.data_dir.clone().unwrap_or_else(storage::default_data_dir);

    // ログは画面を汚さないようにファイルへ
    init_tracing(&data_dir)?;
    info!(data_dir = %data_dir.display(), "starting");

    let store = ProgressStore::load(FileStore::new(&data_dir), config.curriculum_size);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let speaker = Speaker::from_config(&config);
            let mut app = App::new(config, store, speaker, cli.script.into());
            let mut terminal = setup_terminal()?;
            let result = run_app(&mut terminal, &mut app);
            restore_terminal(&mut terminal)?;
            result
        }
        Command::Stats => {
            print_stats(&store);
            Ok(())
        }
        Command::Reset { yes } => reset(store, yes),
    }
}

fn init_tracing(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = File::create(data_dir.join("kanawiz.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// --------------------------------------------------
// サブコマンド
// --------------------------------------------------

fn print_stats(store: &ProgressStore<FileStore>) {
    let stats = store.stats();
    println!("{}", style("KANA WiZ progress").magenta().bold());
    print_line("Overall", &stats);
    for script in Script::ALL {
        print_line(script.label(), &store.stats_for(script));
    }
    println!(
        "Study streak: {} days / Sessions: {}",
        style(stats.study_streak).yellow(),
        style(stats.total_sessions).yellow()
    );

    let (count, pct) = dashboard::daily_goal(&stats);
    println!("Daily goal: {count}/{} ({pct}%)", dashboard::DAILY_GOAL);

    println!();
    println!("{}", style("Achievements").bold());
    for a in dashboard::achievements(&stats) {
        if a.unlocked {
            println!("  {} {} - {}", style("★").yellow(), a.title, a.description);
        } else {
            println!("  {} {} - {}", style("☆").dim(), style(a.title).dim(), style(a.description).dim());
        }
    }
}

fn print_line(label: &str, stats: &ProgressStats) {
    println!(
        "{:<10} {}/{} known ({}%), {} need study",
        label,
        style(stats.known_count).green(),
        stats.total_characters,
        stats.percentage,
        style(stats.needs_study_count).red()
    );
}

fn reset(mut store: ProgressStore<FileStore>, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Delete all saved progress?")
            .default(false)
            .interact()
            .map_err(io::Error::other)?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }
    store.reset();
    store.save().map_err(io::Error::other)?;
    println!("{}", style("Progress cleared.").green());
    Ok(())
}

// --------------------------------------------------
// TUIセットアップと実行ループ
// --------------------------------------------------

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(_terminal: &mut Terminal<impl Backend>) -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, app: &mut App<FileStore>) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }
        // タイマーはキー入力が無くても進める
        app.on_tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    info!("bye");
    Ok(())
}
