use super::LikesApi;
use crate::api::error::LikeError;
use crate::api::wire::{decode_body, decode_likes, CafeIdBody};
use crate::engine::state::CafeId;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

pub const LIKES_PATH: &str = "/api/likes";
pub const LIKE_PATH: &str = "/api/like";
pub const UNLIKE_PATH: &str = "/api/unlike";

/// reqwestによる `LikesApi` の実装
#[derive(Debug, Clone)]
pub struct HttpLikesApi {
    client: Client,
    base_url: String,
    /// ネイティブ環境用のセッションCookie（ブラウザでは不要）
    session_cookie: Option<String>,
}

impl HttpLikesApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }

    async fn post_cafe(&self, path: &str, cafe_id: CafeId) -> Result<(), LikeError> {
        let request = self.client.post(self.url(path)).json(&CafeIdBody { cafe_id });
        let response = self.authorize(request).send().await?;
        let text = read_body(response).await?;
        decode_body(&text)?;
        Ok(())
    }
}

/// 本文を読み取り、2xx以外は本文にエラーが無い場合のみ `Status` として扱う
async fn read_body(response: Response) -> Result<String, LikeError> {
    let status = response.status();
    let text = response.text().await?;
    log::debug!("{} -> {} bytes", status, text.len());

    if !status.is_success() {
        // 本文が `{error: ..}` ならそちらを優先
        if let Err(e @ LikeError::Remote(_)) = decode_body(&text) {
            return Err(e);
        }
        return Err(LikeError::Status(status.as_u16()));
    }
    Ok(text)
}

#[async_trait(?Send)]
impl LikesApi for HttpLikesApi {
    async fn fetch_likes(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        let request = self
            .client
            .get(self.url(LIKES_PATH))
            .query(&[("cafe_id", cafe_id.to_string())]);
        let response = self.authorize(request).send().await?;
        let text = read_body(response).await?;
        decode_likes(&text)
    }

    async fn like(&self, cafe_id: CafeId) -> Result<(), LikeError> {
        self.post_cafe(LIKE_PATH, cafe_id).await
    }

    async fn unlike(&self, cafe_id: CafeId) -> Result<(), LikeError> {
        self.post_cafe(UNLIKE_PATH, cafe_id).await
    }
}
