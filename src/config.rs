use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 解析サーバーの既定URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// 設定ファイルより優先される環境変数
pub const SERVER_URL_ENV: &str = "ANALYZER_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
        }
    }
}

impl Config {
    pub fn with_server_url(url: impl Into<String>) -> Self {
        Self {
            server_url: url.into(),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AnalyzerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home
            .join(".config")
            .join("multimodal-analyzer")
            .join("config.json"))
    }

    /// 環境変数が設定されていればサーバーURLを上書き
    pub fn with_env_override(self) -> Self {
        self.with_env_url(std::env::var(SERVER_URL_ENV).ok())
    }

    /// 空・空白のみの値は未設定として扱う
    pub fn with_env_url(self, url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self { server_url: url },
            _ => self,
        }
    }

    /// 設定ファイル → 環境変数 → `--server` の順で上書きした実効設定
    ///
    /// 環境変数か `--server` で上書きされる場合、設定ファイルが壊れていても既定値から組み立てる。
    pub fn resolve(path: &Path, env_url: Option<String>, server: Option<String>) -> Result<Self> {
        let env_url = env_url.filter(|url| !url.trim().is_empty());

        let config = match Self::load_from(path) {
            Ok(config) => config,
            Err(e) if env_url.is_some() || server.is_some() => {
                warn!(error = %e, path = %path.display(), "設定ファイルを読めないため既定値を使用");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        let mut config = config.with_env_url(env_url);
        if let Some(url) = server {
            config.set_server_url(url)?;
        }
        Ok(config)
    }

    /// 既定の設定ファイルと `ANALYZER_SERVER_URL` から実効設定を作る
    pub fn effective(server: Option<String>) -> Result<Self> {
        Self::resolve(&Self::config_path()?, std::env::var(SERVER_URL_ENV).ok(), server)
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        validate_url(&url)?;
        self.server_url = url;
        Ok(())
    }

    /// POST先（`{server_url}/analyze`）
    pub fn analyze_url(&self) -> Result<String> {
        Ok(format!("{}/analyze", self.base_url()?))
    }

    /// ヘルスチェック先（`{server_url}/`）
    pub fn health_url(&self) -> Result<String> {
        Ok(format!("{}/", self.base_url()?))
    }

    fn base_url(&self) -> Result<&str> {
        validate_url(&self.server_url)?;
        Ok(self.server_url.trim().trim_end_matches('/'))
    }
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AnalyzerError::Config(format!(
            "サーバーURLは http:// または https:// で始まる必要があります: {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_endpoints() {
        let config = Config::default();
        assert_eq!(config.analyze_url().unwrap(), "http://127.0.0.1:8000/analyze");
        assert_eq!(config.health_url().unwrap(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = Config::with_server_url("https://analyzer.example.com/ ");
        assert_eq!(config.analyze_url().unwrap(), "https://analyzer.example.com/analyze");
    }

    #[test]
    fn test_invalid_scheme_is_rejected() {
        let config = Config::with_server_url("ftp://example.com");
        assert!(matches!(config.analyze_url(), Err(AnalyzerError::Config(_))));

        let mut config = Config::default();
        assert!(config.set_server_url("localhost:8000".into()).is_err());
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_server_url("http://10.0.0.5:9000".into()).unwrap();
        config.save_to(&path).expect("設定保存失敗");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    /// テスト中だけ環境変数を設定し、終了時に元へ戻す
    struct ScopedEnv {
        key: &'static str,
        previous: Option<String>,
    }

    impl ScopedEnv {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_resolve_uses_file_without_overrides() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), r#"{"server_url": "http://file.local:8000"}"#);

        let config = Config::resolve(&path, None, None).unwrap();
        assert_eq!(config.server_url, "http://file.local:8000");
    }

    #[test]
    fn test_resolve_env_beats_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), r#"{"server_url": "http://file.local:8000"}"#);

        let config = Config::resolve(&path, Some("http://env.local:8000".into()), None).unwrap();
        assert_eq!(config.server_url, "http://env.local:8000");
    }

    #[test]
    fn test_resolve_ignores_blank_env() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), r#"{"server_url": "http://file.local:8000"}"#);

        for blank in ["", "   ", "\t\n"] {
            let config = Config::resolve(&path, Some(blank.into()), None).unwrap();
            assert_eq!(config.server_url, "http://file.local:8000");
        }
    }

    #[test]
    fn test_resolve_server_beats_env() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), r#"{"server_url": "http://file.local:8000"}"#);

        let config = Config::resolve(
            &path,
            Some("http://env.local:8000".into()),
            Some("https://cli.local".into()),
        )
        .unwrap();
        assert_eq!(config.server_url, "https://cli.local");
        assert_eq!(config.analyze_url().unwrap(), "https://cli.local/analyze");
    }

    #[test]
    fn test_resolve_rejects_invalid_server() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");

        let result = Config::resolve(&path, None, Some("localhost:8000".into()));
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }

    #[test]
    fn test_resolve_corrupt_file_without_override_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), "{ not json");

        let result = Config::resolve(&path, None, None);
        assert!(matches!(result, Err(AnalyzerError::JsonParse(_))));

        let result = Config::resolve(&path, Some("  ".into()), None);
        assert!(matches!(result, Err(AnalyzerError::JsonParse(_))));
    }

    #[test]
    fn test_resolve_corrupt_file_with_override_uses_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(dir.path(), "{ not json");

        let config = Config::resolve(&path, None, Some("http://10.0.0.5:9000".into())).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.5:9000");

        let config = Config::resolve(&path, Some("http://env.local:8000".into()), None).unwrap();
        assert_eq!(config.server_url, "http://env.local:8000");
    }

    #[test]
    fn test_with_env_override_reads_variable() {
        {
            let _env = ScopedEnv::set(SERVER_URL_ENV, "http://env.local:7000");
            let config = Config::default().with_env_override();
            assert_eq!(config.server_url, "http://env.local:7000");
        }

        {
            let _env = ScopedEnv::set(SERVER_URL_ENV, " ");
            let config = Config::default().with_env_override();
            assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        }
    }
}
