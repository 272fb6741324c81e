//! APIレスポンスパーサー
//!
//! 解析サービスのレスポンスボディをRawResponseに変換する

use crate::error::{Error, Result};
use crate::types::RawResponse;
use serde_json::Value;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// レスポンスボディをパース
///
/// # Returns
/// * `Ok(RawResponse)` - JSONオブジェクトとしてパース成功
/// * `Err(Error::Json)` - JSONとして不正
/// * `Err(Error::Parse)` - JSONだがオブジェクトではない
///
/// # Examples
/// ```
/// use analyzer_common::parse_raw_response;
///
/// let raw = parse_raw_response(r#"{"topic_classification": "Food Safety"}"#).unwrap();
/// assert_eq!(raw.len(), 1);
/// ```
pub fn parse_raw_response(body: &str) -> Result<RawResponse> {
    let value: Value = serde_json::from_str(body.trim())?;
    let kind = kind_of(&value);
    RawResponse::from_value(value)
        .ok_or_else(|| Error::Parse(format!("expected a JSON object, got {}", kind)))
}
