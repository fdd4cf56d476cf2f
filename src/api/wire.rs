use crate::api::error::LikeError;
use crate::engine::state::CafeId;
use serde::Serialize;
use serde_json::{Map, Value};

/// `POST /api/like` と `POST /api/unlike` の本文
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CafeIdBody {
    pub cafe_id: CafeId,
}

/// レスポンス本文をJSONオブジェクトとして解析する
///
/// トップレベルに `error` キーがあれば、値に関わらず `LikeError::Remote` になる。
pub fn decode_body(text: &str) -> Result<Map<String, Value>, LikeError> {
    let mut body = parse_object(text)?;
    take_error(&mut body)?;
    Ok(body)
}

/// `GET /api/likes` の本文から `likes` の真偽を取り出す
pub fn decode_likes(text: &str) -> Result<bool, LikeError> {
    let mut body = parse_object(text)?;
    // errorキーを取り除く前の本文をそのまま残す
    log::debug!("likes response: {:?}", body);
    take_error(&mut body)?;
    Ok(body.get("likes").is_some_and(is_truthy))
}

fn parse_object(text: &str) -> Result<Map<String, Value>, LikeError> {
    match serde_json::from_str(text)? {
        Value::Object(body) => Ok(body),
        _ => Err(LikeError::NotAnObject),
    }
}

fn take_error(body: &mut Map<String, Value>) -> Result<(), LikeError> {
    match body.remove("error") {
        Some(Value::String(message)) => Err(LikeError::Remote(message)),
        Some(other) => Err(LikeError::Remote(other.to_string())),
        None => Ok(()),
    }
}

/// ページスクリプトと同じ真偽判定
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
