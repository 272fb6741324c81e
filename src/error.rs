use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("サーバーエラー: {0}")]
    ServerStatus(u16),

    #[error("解析がキャンセルされました")]
    Cancelled,

    #[error("レスポンスの解析に失敗: {0}")]
    Decode(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] analyzer_common::Error),
}

impl AnalyzerError {
    /// 送信前に同期的に拒否されたエラーか
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalyzerError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
