use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 表示中のカフェのID（ページから渡される）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CafeId(pub u64);

impl fmt::Display for CafeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CafeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CafeId)
            .map_err(|e| format!("invalid cafe id '{}': {}", s, e))
    }
}

impl From<u32> for CafeId {
    fn from(id: u32) -> Self {
        CafeId(id as u64)
    }
}

/// いいね状態
///
/// `Unknown` は初回取得が完了するまでの状態。成功したレスポンスでのみ遷移する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeState {
    #[default]
    Unknown,
    Liked,
    NotLiked,
}

impl LikeState {
    /// `GET /api/likes` の結果から状態を作る
    pub fn from_likes(likes: bool) -> Self {
        if likes { LikeState::Liked } else { LikeState::NotLiked }
    }

    /// (likeボタン表示, unlikeボタン表示)
    pub fn visibility(self) -> (bool, bool) {
        match self {
            LikeState::Unknown => (false, false),
            LikeState::Liked => (false, true),
            LikeState::NotLiked => (true, false),
        }
    }

    /// 表示中のボタンで実行されるアクション
    pub fn toggle_action(self) -> Option<Action> {
        match self {
            LikeState::Unknown => None,
            LikeState::Liked => Some(Action::Unlike),
            LikeState::NotLiked => Some(Action::Like),
        }
    }
}

impl fmt::Display for LikeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LikeState::Unknown => "unknown",
            LikeState::Liked => "liked",
            LikeState::NotLiked => "not liked",
        };
        f.write_str(s)
    }
}

/// ユーザー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Unlike,
}

impl Action {
    /// 成功時の遷移先
    pub fn target_state(self) -> LikeState {
        match self {
            Action::Like => LikeState::Liked,
            Action::Unlike => LikeState::NotLiked,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Like => "like",
            Action::Unlike => "unlike",
        }
    }
}

/// ユーザー操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// リモート書き込みが成功し、UIに反映された
    Applied(LikeState),
    /// 別のリクエストが処理中のため破棄された
    Skipped,
}
