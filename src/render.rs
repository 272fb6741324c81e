//! 結果の描画
//!
//! コントローラーの状態を受け取り、端末向けテキストまたはJSONで出力する。

use crate::controller::{ControllerSnapshot, RequestPhase};
use crate::error::Result;
use analyzer_common::{NormalizedResult, RawResponse};
use std::io::Write;

const SUMMARY_FALLBACK: &str = "Analysis of the provided text content";
const OCR_FALLBACK: &str = "No text detected";

pub trait Renderer {
    fn render_result(&mut self, result: &NormalizedResult) -> Result<()>;
    fn render_error(&mut self, message: &str) -> Result<()>;
}

/// 終端状態のスナップショットを描画する（Idle / Submitting は何も出さない）
pub fn present<R: Renderer + ?Sized>(renderer: &mut R, snapshot: &ControllerSnapshot) -> Result<()> {
    match (snapshot.phase, &snapshot.result, &snapshot.error_message) {
        (RequestPhase::Succeeded, Some(result), _) => renderer.render_result(result),
        (RequestPhase::Failed, _, Some(message)) => renderer.render_error(message),
        _ => Ok(()),
    }
}

/// 0.0〜1.0 のスコアを四捨五入したパーセント表記に
pub fn format_percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// 端末向けのカード形式テキスト
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_result(&mut self, result: &NormalizedResult) -> Result<()> {
        let out = &mut self.out;

        writeln!(out, "Results")?;
        writeln!(out, "  {:<22}{}", "Text Sentiment:", capitalize(&result.sentiment_label))?;
        writeln!(out, "  {:<22}{}", "", or_fallback(&result.text_summary, SUMMARY_FALLBACK))?;
        writeln!(out, "  {:<22}{}", "Topic Classification:", result.topic)?;
        writeln!(out, "  {:<22}'{}'", "OCR:", or_fallback(&result.ocr_text, OCR_FALLBACK))?;
        writeln!(out, "  {:<22}{}", "Text Toxicity:", format_percent(result.text_toxicity))?;
        writeln!(out, "  {:<22}{}", "Image Toxicity:", format_percent(result.image_toxicity))?;
        if let Some(label) = &result.image_label {
            writeln!(out, "  {:<22}{}", "Image Category:", label)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", result.automated_response)?;
        out.flush()?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "Error: {}", message)?;
        self.out.flush()?;
        Ok(())
    }
}

/// camelCase JSON 出力
///
/// 生レスポンスを渡した場合は `{"result": ..., "raw": ...}` の1文書にまとめる。
pub struct JsonRenderer<W: Write> {
    out: W,
    raw: Option<RawResponse>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, raw: None }
    }

    pub fn with_raw(mut self, raw: Option<RawResponse>) -> Self {
        self.raw = raw;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_result(&mut self, result: &NormalizedResult) -> Result<()> {
        match &self.raw {
            Some(raw) => serde_json::to_writer_pretty(
                &mut self.out,
                &serde_json::json!({ "result": result, "raw": raw }),
            )?,
            None => serde_json::to_writer_pretty(&mut self.out, result)?,
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &serde_json::json!({ "error": message }))?;
        writeln!(self.out)?;
        Ok(())
    }
}
