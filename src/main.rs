use clap::Parser;
use price_scout::app::history::render_history;
use price_scout::config::{Command, RendererKind};
use price_scout::domain::ports::{ConfigProvider, ProductStore, Renderer};
use price_scout::utils::error::{ErrorSeverity, ScrapeError};
use price_scout::utils::{logger, validation::Validate};
use price_scout::{Cli, Extractor, HttpRenderer, ScoutConfig, ScrapeEngine, SqliteStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting price-scout");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32, ScrapeError> {
    let mut config = ScoutConfig::load_or_default(cli.config.as_ref())?;

    // 套用命令列覆蓋設定
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }
    if let Command::Scrape { webdriver: true, .. } = &cli.command {
        config.renderer.kind = RendererKind::Webdriver;
        tracing::info!("🔧 Renderer overridden to: webdriver");
    }

    // 驗證配置
    config.validate()?;

    let store = SqliteStore::connect(config.database_path()).await?;
    let result = dispatch(cli.command, &config, &store).await;

    // 無論成功與否都關閉連線池
    store.close().await;
    result
}

async fn dispatch(command: Command, config: &ScoutConfig, store: &SqliteStore) -> Result<i32, ScrapeError> {
    match command {
        Command::Scrape { url, .. } => {
            let renderer = build_renderer(config)?;
            let engine = ScrapeEngine::new(renderer, store.clone(), Extractor::new(config.rules.clone()));

            match engine.run(&url).await {
                Ok(report) => {
                    println!("{}", report.record.summary());
                    Ok(if report.record.is_success() { 0 } else { 1 })
                }
                Err(e) => Ok(report_error(&e)),
            }
        }
        Command::History { format } => {
            let entries = store.history().await?;
            println!("{}", render_history(&entries, format)?);
            Ok(0)
        }
    }
}

fn build_renderer(config: &ScoutConfig) -> Result<Box<dyn Renderer>, ScrapeError> {
    match config.renderer.kind {
        RendererKind::Http => Ok(Box::new(HttpRenderer::from_config(config)?)),
        RendererKind::Webdriver => build_webdriver_renderer(config),
    }
}

#[cfg(feature = "webdriver")]
fn build_webdriver_renderer(config: &ScoutConfig) -> Result<Box<dyn Renderer>, ScrapeError> {
    use price_scout::adapters::WebDriverRenderer;
    use std::time::Duration;

    Ok(Box::new(WebDriverRenderer::new(
        config.renderer.webdriver_url.clone(),
        config.renderer.user_agent.clone(),
        config.renderer.headless,
        Duration::from_millis(config.renderer.settle_millis),
    )))
}

#[cfg(not(feature = "webdriver"))]
fn build_webdriver_renderer(_config: &ScoutConfig) -> Result<Box<dyn Renderer>, ScrapeError> {
    Err(ScrapeError::Config {
        message: "WebDriver rendering requires building with `--features webdriver`".to_string(),
    })
}

/// 記錄錯誤並回傳對應的退出碼
fn report_error(e: &ScrapeError) -> i32 {
    tracing::error!(
        "❌ price-scout failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
