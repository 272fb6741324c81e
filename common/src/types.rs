//! 解析リクエスト・レスポンスの型定義
//!
//! - AnalysisInput: 送信するテキストと添付画像
//! - RawResponse: 解析サービスが返す未整形のJSONオブジェクト
//! - NormalizedResult: 表示用に全フィールドを補完した結果

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 感情ラベルが取得できない場合の既定値
pub const DEFAULT_SENTIMENT_LABEL: &str = "Unknown";

/// トピックが取得できない場合の既定値
pub const DEFAULT_TOPIC: &str = "General";

/// 自動応答文が取得できない場合の既定値
pub const DEFAULT_AUTOMATED_RESPONSE: &str =
    "Thank you for your feedback. We'll review this content accordingly.";

/// 添付ファイル（画像）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 拡張子からMIMEタイプを推定（不明な場合は application/octet-stream）
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

/// 解析対象の入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// テキスト（空でない）か添付ファイルの少なくとも一方があるか
    pub fn is_submittable(&self) -> bool {
        !self.text.is_empty() || self.attachment.is_some()
    }
}

/// 解析サービスの生レスポンス
///
/// フィールドはすべて任意で、同じフィールドが文字列・オブジェクト・
/// 候補リストのいずれの形でも届きうる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResponse(Map<String, Value>);

impl RawResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSONオブジェクトであればRawResponseに変換
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawResponse {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 表示用の正規化済み結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    /// 小文字化済みの感情ラベル（取得できない場合は "Unknown"）
    pub sentiment_label: String,
    pub text_summary: String,
    pub topic: String,
    pub ocr_text: String,
    /// 0.0〜1.0
    pub text_toxicity: f64,
    /// 0.0〜1.0
    pub image_toxicity: f64,
    /// None の場合は画像カテゴリ自体を表示しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_label: Option<String>,
    pub automated_response: String,
}

impl Default for NormalizedResult {
    fn default() -> Self {
        Self {
            sentiment_label: DEFAULT_SENTIMENT_LABEL.to_string(),
            text_summary: String::new(),
            topic: DEFAULT_TOPIC.to_string(),
            ocr_text: String::new(),
            text_toxicity: 0.0,
            image_toxicity: 0.0,
            image_label: None,
            automated_response: DEFAULT_AUTOMATED_RESPONSE.to_string(),
        }
    }
}
