//! HTTP (multipart) による解析サービス呼び出し

use super::AnalysisService;
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use analyzer_common::{parse_raw_response, AnalysisInput, RawResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

pub struct HttpAnalysisService {
    client: reqwest::Client,
    analyze_url: String,
    health_url: String,
}

impl HttpAnalysisService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            analyze_url: config.analyze_url()?,
            health_url: config.health_url()?,
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// サーバーのルートにGETし、稼働メッセージを返す
    pub async fn health(&self) -> Result<String> {
        debug!(url = %self.health_url, "ヘルスチェック送信");

        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::ServerStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        Ok(message)
    }
}

/// `text` は常に、`file` は添付がある場合のみ送る
fn build_form(input: &AnalysisInput) -> Result<Form> {
    let mut form = Form::new().text("text", input.text.clone());

    if let Some(attachment) = &input.attachment {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(attachment.mime_type())
            .map_err(|e| AnalyzerError::Transport(format!("multipartの構築に失敗: {}", e)))?;
        form = form.part("file", part);
    }

    Ok(form)
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, input: &AnalysisInput) -> Result<RawResponse> {
        let form = build_form(input)?;

        debug!(
            url = %self.analyze_url,
            text_len = input.text.len(),
            has_file = input.attachment.is_some(),
            "解析リクエスト送信"
        );

        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "解析サーバーがエラーを返しました");
            return Err(AnalyzerError::ServerStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;

        debug!(status = status.as_u16(), body_len = body.len(), "解析レスポンス受信");

        parse_raw_response(&body).map_err(|e| AnalyzerError::Decode(e.to_string()))
    }
}
