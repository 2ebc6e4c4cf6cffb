//! 审计服务 - 业务能力层
//!
//! 只负责"审计一个 URL × 一个设备"，不关心保存

use std::future::Future;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::AuditError;
use crate::infrastructure::LighthouseCli;
use crate::models::{AuditResult, DeviceProfile};

/// 审计能力
///
/// 编排层只依赖这个 trait，方便在测试里替换
#[async_trait]
pub trait Auditor: Send + Sync {
    async fn audit(&self, url: &str, device: DeviceProfile) -> Result<AuditResult, AuditError>;
}

/// 基于 Lighthouse CLI 的审计实现
///
/// 每次审计独占一个新启动的无头浏览器，审计结束（无论成功失败）后关闭
pub struct LighthouseAuditor {
    cli: LighthouseCli,
    chrome_executable: Option<PathBuf>,
}

impl LighthouseAuditor {
    pub fn new(config: &Config) -> Self {
        Self {
            cli: LighthouseCli::new(config.lighthouse_bin.clone()),
            chrome_executable: config.chrome_executable.clone(),
        }
    }
}

#[async_trait]
impl Auditor for LighthouseAuditor {
    async fn audit(&self, url: &str, device: DeviceProfile) -> Result<AuditResult, AuditError> {
        info!("运行 Lighthouse ({}): {}", device, url);

        let output = with_browser(self.chrome_executable.clone(), |port| {
            self.cli.run(url, device, port)
        })
        .await?;

        if let Some(final_url) = output.report.redirected_from(url) {
            info!("{} 已跳转至 {}", url, final_url);
        }

        let scores = output.report.scores();
        debug!("{} ({}) 分数: {}", url, device, scores);

        Ok(AuditResult {
            url: url.to_string(),
            device,
            scores,
            report_html: output.html,
        })
    }
}

/// 在独占浏览器中执行 `f`，返回前一定关闭浏览器
pub async fn with_browser<F, Fut, T>(
    chrome_executable: Option<PathBuf>,
    f: F,
) -> Result<T, AuditError>
where
    F: FnOnce(u16) -> Fut,
    Fut: Future<Output = Result<T, AuditError>>,
{
    let session = BrowserSession::launch(chrome_executable.as_deref()).await?;
    let result = f(session.port()).await;
    session.close().await;
    result
}
