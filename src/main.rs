use analyzer_common::normalize;
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use multimodal_analyzer::{analyzer, cli, config, controller, input, render};
use analyzer::HttpAnalysisService;
use cli::{Cli, Commands};
use config::Config;
use controller::{RequestController, RequestPhase};
use render::{JsonRenderer, Renderer, TextRenderer};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn renderer_for(json: bool) -> Box<dyn Renderer> {
    if json {
        Box::new(JsonRenderer::new(std::io::stdout()))
    } else {
        Box::new(TextRenderer::new(std::io::stdout()))
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Analyzing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn effective_config(server: Option<String>) -> anyhow::Result<Config> {
    Config::effective(server).context("設定の読み込みに失敗")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze { text, file, json, raw } => {
            let config = effective_config(cli.server)?;
            let input = input::build_input(text, file.as_deref())?;
            let service = HttpAnalysisService::new(&config)?;
            eprintln!("🔎 送信先: {}", service.analyze_url());

            let controller = RequestController::new(service);
            let pb = spinner();
            let outcome = controller.submit(&input).await;
            pb.finish_and_clear();

            if let Err(e) = outcome {
                if e.is_validation() {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
                return Err(e.into());
            }

            let snapshot = controller.snapshot();
            let raw_response = if raw { controller.raw_response() } else { None };
            if json {
                let mut renderer = JsonRenderer::new(std::io::stdout()).with_raw(raw_response);
                render::present(&mut renderer, &snapshot)?;
            } else {
                let mut renderer = TextRenderer::new(std::io::stdout());
                render::present(&mut renderer, &snapshot)?;
                if let Some(raw_response) = raw_response {
                    println!("{}", serde_json::to_string_pretty(&raw_response)?);
                }
            }

            if snapshot.phase == RequestPhase::Failed {
                std::process::exit(1);
            }
            eprintln!("✔ 解析完了");
        }

        Commands::Normalize { input, json } => {
            let raw_response = input::read_raw_response(&input)
                .with_context(|| format!("読み込みに失敗: {}", input.display()))?;
            let result = normalize(&raw_response);

            let mut renderer = renderer_for(json);
            renderer.render_result(&result)?;
        }

        Commands::Health => {
            let config = effective_config(cli.server)?;
            let service = HttpAnalysisService::new(&config)?;
            let message = service.health().await?;
            println!("✔ {}", message);
        }

        Commands::Config { set_server, show } => {
            let mut config = Config::load().context("設定ファイルの読み込みに失敗")?;

            if let Some(url) = set_server {
                config.set_server_url(url)?;
                config.save()?;
                println!("✔ サーバーURLを設定しました");
            }

            if show {
                let effective = config.clone().with_env_override();
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  サーバーURL: {}", config.server_url);
                if effective.server_url != config.server_url {
                    println!("  ({} により上書き: {})", config::SERVER_URL_ENV, effective.server_url);
                }
            }
        }
    }

    Ok(())
}
