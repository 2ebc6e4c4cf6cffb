use anyhow::Result;
use clap::Parser;
use sitemap_audit::utils::logging;
use sitemap_audit::{App, Config};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-audit",
    about = "Run Lighthouse on every URL of a sitemap and keep the reports that are not perfect",
    version,
    long_about = None
)]
struct Args {
    /// Sitemap URL to audit
    sitemap_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config = Config::from_env().with_sitemap_url(args.sitemap_url.unwrap_or_default());

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
