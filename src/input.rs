//! 入力の組み立て

use crate::error::{AnalyzerError, Result};
use analyzer_common::{parse_raw_response, AnalysisInput, Attachment, RawResponse};
use std::path::Path;

/// 画像ファイルを読み込んで添付にする
pub fn read_attachment(path: &Path) -> Result<Attachment> {
    if !path.is_file() {
        return Err(AnalyzerError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(Attachment::new(file_name, bytes))
}

/// CLI引数から入力を作る（検証はコントローラーが行う）
pub fn build_input(text: Option<String>, file: Option<&Path>) -> Result<AnalysisInput> {
    let input = AnalysisInput::new(text.unwrap_or_default());
    match file {
        Some(path) => Ok(input.with_attachment(read_attachment(path)?)),
        None => Ok(input),
    }
}

/// 保存済みの生レスポンスJSONを読み込む
pub fn read_raw_response(path: &Path) -> Result<RawResponse> {
    if !path.is_file() {
        return Err(AnalyzerError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(parse_raw_response(&content)?)
}
