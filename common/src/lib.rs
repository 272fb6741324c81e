//! Multimodal Analyzer Common Library
//!
//! 解析サービスのレスポンス型・パーサー・正規化処理（I/Oなし）

pub mod types;
pub mod error;
pub mod parser;
pub mod normalizer;

pub use types::{
    AnalysisInput, Attachment, NormalizedResult, RawResponse, DEFAULT_AUTOMATED_RESPONSE,
    DEFAULT_SENTIMENT_LABEL, DEFAULT_TOPIC,
};
pub use error::{Error, Result};
pub use parser::parse_raw_response;
pub use normalizer::{normalize, FieldShape};
