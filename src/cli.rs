use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multimodal-analyzer")]
#[command(about = "テキスト・画像のマルチモーダル解析クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サーバーのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// テキストと画像を解析サーバーに送信して結果を表示
    Analyze {
        /// 解析するテキスト
        #[arg(short, long)]
        text: Option<String>,

        /// 画像ファイル
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// サーバーの生レスポンスも出力（--json と併用時は {"result", "raw"} にまとめる）
        #[arg(long)]
        raw: bool,
    },

    /// 保存済みの生レスポンスJSONを正規化して表示（サーバーに接続しない）
    Normalize {
        /// 生レスポンスJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 解析サーバーの稼働確認
    Health,

    /// 設定を表示/編集
    Config {
        /// サーバーURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "multimodal-analyzer",
            "--server",
            "http://localhost:9000",
            "analyze",
            "--text",
            "great food",
            "--json",
            "--raw",
        ]);

        assert_eq!(cli.server.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Commands::Analyze { text, file, json, raw } => {
                assert_eq!(text.as_deref(), Some("great food"));
                assert!(file.is_none());
                assert!(json);
                assert!(raw);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_defaults_to_text() {
        let cli = Cli::parse_from(["multimodal-analyzer", "analyze", "-f", "sign.png"]);

        assert!(cli.server.is_none());
        match cli.command {
            Commands::Analyze { text, file, json, raw } => {
                assert!(text.is_none());
                assert_eq!(file.unwrap(), PathBuf::from("sign.png"));
                assert!(!json);
                assert!(!raw);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_normalize_json() {
        let cli = Cli::parse_from(["multimodal-analyzer", "normalize", "saved.json", "--json"]);

        match cli.command {
            Commands::Normalize { input, json } => {
                assert_eq!(input, PathBuf::from("saved.json"));
                assert!(json);
            }
            _ => panic!("expected normalize"),
        }
    }
}
