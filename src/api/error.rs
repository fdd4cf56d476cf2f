use thiserror::Error;

/// いいね操作で発生するエラー
#[derive(Error, Debug)]
pub enum LikeError {
    /// レスポンス本文に `error` フィールドが含まれていた（アプリケーションレベルのエラー）
    #[error("remote operation failed: {0}")]
    Remote(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx以外で、本文にエラー情報が無いもの
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("DOM error: {0}")]
    Dom(String),
}

impl LikeError {
    /// アプリケーションレベルのエラーかどうか
    pub fn is_remote(&self) -> bool {
        matches!(self, LikeError::Remote(_))
    }
}
