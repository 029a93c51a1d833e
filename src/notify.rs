// ============================================
// src/notify.rs
// トースト通知の受け口
// ============================================

/// 画面に一時的なメッセージを出す口。描画や消え方は呼び出し側の責任
pub trait Notifier {
    fn show_message(&mut self, text: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn show_message(&mut self, text: &str) {
        self(text)
    }
}

/// 受け取ったメッセージを順に溜めるだけの実装
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最新のメッセージ
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Notifier for MessageLog {
    fn show_message(&mut self, text: &str) {
        tracing::debug!(message = text, "toast");
        self.messages.push(text.to_string());
    }
}
