//! 批量审计处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责整批 URL 的审计调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建报告根目录、构造各项服务
//! 2. **加载 URL**：从 sitemap 获取全部页面
//! 3. **串行调度**：每个 URL 先 mobile 后 desktop，上一个审计的浏览器关闭后才开始下一个
//! 4. **失败隔离**：单次审计失败只记录日志，不影响后续
//! 5. **全局统计**：汇总审计与报告数量
//!
//! ## 设计特点
//!
//! - **严格串行**：不并发，不重试
//! - **显式配置**：Config 在启动时构造一次并传入
//! - **向下委托**：委托 AuditFlow 处理单次审计

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::DeviceProfile;
use crate::services::{Auditor, LighthouseAuditor, ReportWriter, SitemapService};
use crate::utils::logging::{log_startup, log_url_start, log_urls_loaded, print_final_stats};
use crate::workflow::{AuditCtx, AuditFlow, AuditOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    sitemap: SitemapService,
    flow: AuditFlow,
}

impl App {
    /// 使用 Lighthouse 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let auditor = Arc::new(LighthouseAuditor::new(&config));
        Self::with_auditor(config, auditor).await
    }

    /// 使用指定的审计实现初始化应用
    pub async fn with_auditor(config: Config, auditor: Arc<dyn Auditor>) -> Result<Self> {
        log_startup(&config);

        ensure_reports_dir(&config)?;

        let sitemap = SitemapService::new(Duration::from_secs(config.sitemap_timeout_secs))
            .context("无法创建 HTTP 客户端")?;
        let writer = ReportWriter::new(config.reports_dir.clone(), config.save_policy);
        let flow = AuditFlow::new(auditor, writer);

        Ok(Self {
            config,
            sitemap,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        info!("正在获取 sitemap...");
        let urls = self.sitemap.fetch_urls(&self.config.sitemap_url).await;

        let mut stats = RunStats {
            urls: urls.len(),
            ..Default::default()
        };

        if urls.is_empty() {
            warn!("⚠️ sitemap 中没有可审计的 URL，程序结束");
            print_final_stats(&stats, &self.config);
            return Ok(stats);
        }

        log_urls_loaded(urls.len());

        let total = urls.len();
        for (index, url) in urls.into_iter().enumerate() {
            let url_index = index + 1;
            log_url_start(url_index, total, &url);

            for device in DeviceProfile::ALL {
                let ctx = AuditCtx::new(url.clone(), url_index, total, device);
                let outcome = self.flow.run(&ctx).await?;
                stats.record(outcome);
            }
        }

        print_final_stats(&stats, &self.config);

        Ok(stats)
    }
}

/// 创建报告根目录（非递归，已存在则忽略）
fn ensure_reports_dir(config: &Config) -> Result<()> {
    match std::fs::create_dir(&config.reports_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && config.reports_dir.is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| {
            format!("无法创建报告目录: {}", config.reports_dir.display())
        }),
    }
}

/// 运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// sitemap 中的 URL 数量
    pub urls: usize,
    /// 审计次数（URL × 设备）
    pub audits: usize,
    /// 写入的报告文件数
    pub reports_written: usize,
    /// 全部满分的审计数
    pub perfect: usize,
    /// 失败的审计数
    pub failed: usize,
}

impl RunStats {
    fn record(&mut self, outcome: AuditOutcome) {
        self.audits += 1;
        match outcome {
            AuditOutcome::Saved(n) => self.reports_written += n,
            AuditOutcome::Perfect => self.perfect += 1,
            AuditOutcome::Failed => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record() {
        let mut stats = RunStats::default();
        stats.record(AuditOutcome::Saved(3));
        stats.record(AuditOutcome::Perfect);
        stats.record(AuditOutcome::Failed);
        assert_eq!(
            stats,
            RunStats {
                urls: 0,
                audits: 3,
                reports_written: 3,
                perfect: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_ensure_reports_dir_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();

        config.reports_dir = dir.path().join("reports");
        assert!(ensure_reports_dir(&config).is_ok());
        // 已存在时不报错
        assert!(ensure_reports_dir(&config).is_ok());

        config.reports_dir = dir.path().join("missing").join("reports");
        assert!(ensure_reports_dir(&config).is_err());
    }

    #[test]
    fn test_ensure_reports_dir_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("reports");
        std::fs::write(&file, "x").unwrap();
        let config = Config {
            reports_dir: file,
            ..Config::default()
        };
        assert!(ensure_reports_dir(&config).is_err());
    }
}
