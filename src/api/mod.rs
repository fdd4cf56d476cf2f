pub mod error;
pub mod http;
pub mod wire;

pub use error::LikeError;
pub use http::HttpLikesApi;

use crate::engine::state::CafeId;
use async_trait::async_trait;

/// いいね状態を保持するリモートリソース
///
/// ブラウザでは `reqwest` のFutureが `Send` ではないため `?Send` で定義する。
#[async_trait(?Send)]
pub trait LikesApi {
    /// `GET /api/likes?cafe_id=..` : 現在のユーザーがいいね済みかどうか
    async fn fetch_likes(&self, cafe_id: CafeId) -> Result<bool, LikeError>;

    /// `POST /api/like`
    async fn like(&self, cafe_id: CafeId) -> Result<(), LikeError>;

    /// `POST /api/unlike`
    async fn unlike(&self, cafe_id: CafeId) -> Result<(), LikeError>;
}
