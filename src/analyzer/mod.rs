//! 解析サービス連携
//!
//! コントローラーは `AnalysisService` 越しにリモートの解析サービスを呼び出す。
//! 1回の呼び出しは1つの終端レスポンス（成功 or エラー）だけを返す。

mod http;

pub use http::HttpAnalysisService;

use crate::error::Result;
use analyzer_common::{AnalysisInput, RawResponse};
use async_trait::async_trait;

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// 入力を1回だけ送信し、デコード済みのレスポンスを返す（リトライなし）
    async fn analyze(&self, input: &AnalysisInput) -> Result<RawResponse>;
}
