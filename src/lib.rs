// ============================================
// src/lib.rs
// KANA WiZ の中身 (TUI からもテストからも使う)
// ============================================

pub mod characters;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod games;
pub mod notify;
pub mod progress;
pub mod speech;
pub mod storage;
pub mod timer;
pub mod vocabulary;

pub use error::{KanaError, Result};
