// ============================================
// src/error.rs
// クレート共通のエラー型
// ============================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Speech synthesis failed: {0}")]
    Speech(String),
}

pub type Result<T> = std::result::Result<T, KanaError>;
