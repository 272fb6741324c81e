//! マルチモーダル解析クライアント
//!
//! - `controller`: リクエストのライフサイクル（状態遷移）
//! - `analyzer`: 解析サービスとの通信
//! - `render`: 正規化済み結果の描画
//!
//! レスポンスの正規化そのものは `analyzer_common` にある。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod render;

pub use analyzer_common::{AnalysisInput, Attachment, NormalizedResult, RawResponse};
pub use controller::{ControllerSnapshot, RequestController, RequestPhase, SubmitOutcome};
