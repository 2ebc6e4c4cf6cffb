//! 日志工具模块
//!
//! 提供日志初始化和批量审计的日志输出辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunStats;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则为 `info`（详细模式为 `debug`）
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Lighthouse sitemap 审计");
    info!("🗺️ sitemap: {}", config.sitemap_url);
    info!("📁 报告目录: {}", config.reports_dir.display());
    info!("📋 保存策略: {}", config.save_policy);
    info!("{}", "=".repeat(60));
}

/// 记录 URL 加载信息
///
/// # 参数
/// - `total`: URL 总数
pub fn log_urls_loaded(total: usize) {
    info!("✓ 找到 {} 个待审计的 URL", total);
    info!("📋 共 {} 次审计（mobile + desktop），逐个串行执行\n", total * 2);
}

/// 记录单个 URL 开始
///
/// # 参数
/// - `index`: URL 编号（从 1 开始）
/// - `total`: URL 总数
/// - `url`: 待审计的 URL
pub fn log_url_start(index: usize, total: usize, url: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📄 [{}/{}] {}", index, total, url);
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 运行统计
/// - `config`: 程序配置
pub fn print_final_stats(stats: &RunStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部审计完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔗 URL: {}", stats.urls);
    info!("🔍 审计: {}", stats.audits);
    info!("📝 报告: {}", stats.reports_written);
    info!("💯 满分: {}", stats.perfect);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", config.reports_dir.display());
}
