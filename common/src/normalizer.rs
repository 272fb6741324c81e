//! レスポンス正規化モジュール
//!
//! 解析サービスのレスポンスは同じフィールドが
//! 文字列 / オブジェクト / 候補リスト のいずれの形でも届きうる。
//! 各フィールドを `FieldShape` に分類し、優先順位付きの候補列から
//! 最初に見つかった値を採用する。どの候補もなければ既定値を使う。
//!
//! ## 優先順位
//! - 感情: `text_sentiment[0].label`（小文字化）
//! - トピック: 文字列そのもの → `primary` → `categories[0].name`
//! - 画像カテゴリ: `scene_classification` → `image_classification[0].label`
//! - 有害度: 数値のみ採用し 0.0〜1.0 に丸める

use crate::types::{
    NormalizedResult, RawResponse, DEFAULT_AUTOMATED_RESPONSE, DEFAULT_SENTIMENT_LABEL,
    DEFAULT_TOPIC,
};
use serde_json::{Map, Value};

const TEXT_SENTIMENT: &str = "text_sentiment";
const TEXT_SUMMARY: &str = "text_summary";
const TOPIC_CLASSIFICATION: &str = "topic_classification";
const OCR_TEXT: &str = "ocr_text";
const TEXT_TOXICITY_SCORE: &str = "text_toxicity_score";
const IMAGE_TOXICITY_SCORE: &str = "image_toxicity_score";
const SCENE_CLASSIFICATION: &str = "scene_classification";
const IMAGE_CLASSIFICATION: &str = "image_classification";
const AUTOMATED_RESPONSE: &str = "automated_response";

/// レスポンス内の値の形
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape<'a> {
    Absent,
    Text(&'a str),
    Number(f64),
    Object(&'a Map<String, Value>),
    List(&'a [Value]),
    /// bool など、どのルールでも使わない形
    Other,
}

impl<'a> FieldShape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldShape::Absent,
            Some(Value::String(s)) => FieldShape::Text(s),
            Some(Value::Number(n)) => n.as_f64().map_or(FieldShape::Other, FieldShape::Number),
            Some(Value::Object(map)) => FieldShape::Object(map),
            Some(Value::Array(items)) => FieldShape::List(items),
            Some(Value::Bool(_)) => FieldShape::Other,
        }
    }

    /// 空でない文字列のみ返す
    pub fn text(self) -> Option<&'a str> {
        match self {
            FieldShape::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn number(self) -> Option<f64> {
        match self {
            FieldShape::Number(n) => Some(n),
            _ => None,
        }
    }

    /// オブジェクトの属性
    pub fn attr(self, key: &str) -> FieldShape<'a> {
        match self {
            FieldShape::Object(map) => FieldShape::of(map.get(key)),
            _ => FieldShape::Absent,
        }
    }

    /// 候補リストの先頭要素
    pub fn first(self) -> FieldShape<'a> {
        match self {
            FieldShape::List(items) => FieldShape::of(items.first()),
            _ => FieldShape::Absent,
        }
    }

    /// 候補リストなら先頭要素、単独のオブジェクトならそれ自身
    pub fn first_or_self(self) -> FieldShape<'a> {
        match self {
            FieldShape::List(_) => self.first(),
            FieldShape::Object(_) => self,
            _ => FieldShape::Absent,
        }
    }
}

/// 候補を優先順に並べ、最初に存在するものを返す
fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().next()
}

fn field<'a>(raw: &'a RawResponse, name: &str) -> FieldShape<'a> {
    FieldShape::of(raw.get(name))
}

/// 0.0〜1.0 に収める（NaNは0）
fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

pub fn resolve_sentiment(raw: &RawResponse) -> Option<String> {
    field(raw, TEXT_SENTIMENT)
        .first_or_self()
        .attr("label")
        .text()
        .map(str::to_lowercase)
}

pub fn resolve_topic(raw: &RawResponse) -> Option<String> {
    let topic = field(raw, TOPIC_CLASSIFICATION);
    first_present([
        topic.text(),
        topic.attr("primary").text(),
        topic.attr("categories").first().attr("name").text(),
    ])
    .map(str::to_string)
}

pub fn resolve_image_label(raw: &RawResponse) -> Option<String> {
    let classification = field(raw, IMAGE_CLASSIFICATION).first();
    first_present([
        field(raw, SCENE_CLASSIFICATION).text(),
        classification.attr("label").text(),
        classification.text(),
    ])
    .map(str::to_string)
}

pub fn resolve_score(raw: &RawResponse, name: &str) -> f64 {
    field(raw, name).number().map_or(0.0, clamp_unit)
}

fn resolve_text(raw: &RawResponse, name: &str) -> Option<String> {
    field(raw, name).text().map(str::to_string)
}

/// 生レスポンスを表示用の結果に正規化する
///
/// 失敗しない。存在しない・形の合わないフィールドはすべて既定値になり、
/// 未知のフィールドは無視される。
pub fn normalize(raw: &RawResponse) -> NormalizedResult {
    NormalizedResult {
        sentiment_label: resolve_sentiment(raw)
            .unwrap_or_else(|| DEFAULT_SENTIMENT_LABEL.to_string()),
        text_summary: resolve_text(raw, TEXT_SUMMARY).unwrap_or_default(),
        topic: resolve_topic(raw).unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        ocr_text: resolve_text(raw, OCR_TEXT).unwrap_or_default(),
        text_toxicity: resolve_score(raw, TEXT_TOXICITY_SCORE),
        image_toxicity: resolve_score(raw, IMAGE_TOXICITY_SCORE),
        image_label: resolve_image_label(raw),
        automated_response: resolve_text(raw, AUTOMATED_RESPONSE)
            .unwrap_or_else(|| DEFAULT_AUTOMATED_RESPONSE.to_string()),
    }
}
