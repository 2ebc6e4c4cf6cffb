use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::BrowserError;

/// 一次审计独占的无头浏览器
///
/// 生命周期与单次审计一致：
/// - `launch()` 获取，`close()` 释放
/// - 未调用 `close()` 时由 `Drop` 兜底：中止事件任务，
///   chromiumoxide 会在后台结束子进程
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    port: u16,
    // 与浏览器同生命周期，drop 时删除
    _profile_dir: TempDir,
}

impl BrowserSession {
    /// 启动无头浏览器（忽略证书错误）
    pub async fn launch(chrome_executable: Option<&Path>) -> Result<Self, BrowserError> {
        info!("🚀 启动无头浏览器...");

        let profile_dir = tempfile::Builder::new()
            .prefix("sitemap-audit-chrome-")
            .tempdir()
            .map_err(BrowserError::ProfileDirFailed)?;

        let mut builder = BrowserConfig::builder()
            .new_headless_mode()
            .user_data_dir(profile_dir.path())
            .args(vec![
                "--ignore-certificate-errors",
                "--disable-gpu",
                "--no-sandbox",
                "--disable-dev-shm-usage",
            ]);
        if let Some(executable) = chrome_executable {
            debug!("浏览器可执行文件: {}", executable.display());
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            BrowserError::ConfigurationFailed(e)
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            BrowserError::LaunchFailed(e)
        })?;

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let address = browser.websocket_address().clone();
        let port = match debug_port(&address) {
            Some(port) => port,
            None => {
                let mut session = Self {
                    browser,
                    handler_task,
                    port: 0,
                    _profile_dir: profile_dir,
                };
                session.shutdown().await;
                return Err(BrowserError::PortUnavailable { address });
            }
        };
        debug!("无头浏览器启动成功，调试端口: {}", port);

        Ok(Self {
            browser,
            handler_task,
            port,
            _profile_dir: profile_dir,
        })
    }

    /// 远程调试端口
    pub fn port(&self) -> u16 {
        self.port
    }

    /// 关闭浏览器并等待进程退出，失败只记录日志
    pub async fn close(mut self) {
        self.shutdown().await;
        debug!("无头浏览器已关闭");
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("正常关闭浏览器失败，尝试强制结束: {}", e);
            if let Some(Err(e)) = self.browser.kill().await {
                error!("强制结束浏览器失败: {}", e);
            }
        }
        if let Err(e) = self.browser.wait().await {
            warn!("等待浏览器进程退出失败: {}", e);
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// 从 `ws://127.0.0.1:PORT/devtools/browser/<id>` 中取出端口
pub fn debug_port(websocket_address: &str) -> Option<u16> {
    url::Url::parse(websocket_address)
        .ok()?
        .port_or_known_default()
}
