use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UIEvent {
    /// 「いいね」ボタンが押された
    LikePressed,
    /// 「いいね解除」ボタンが押された
    UnlikePressed,
    /// 表示中のボタンを押す（ターミナル用）
    TogglePressed,
    /// 現在の状態を再取得する
    Refresh,
}

impl UIEvent {
    /// コマンド名からイベントを作る
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "like" => Some(UIEvent::LikePressed),
            "unlike" => Some(UIEvent::UnlikePressed),
            "toggle" => Some(UIEvent::TogglePressed),
            "status" | "refresh" => Some(UIEvent::Refresh),
            _ => None,
        }
    }
}

pub struct EventQueue {
    pub queue: VecDeque<UIEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }
    pub fn push(&mut self, event: UIEvent) {
        self.queue.push_back(event);
    }
    pub fn pop(&mut self) -> Option<UIEvent> {
        self.queue.pop_front()
    }
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
