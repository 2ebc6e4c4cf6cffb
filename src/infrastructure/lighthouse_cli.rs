//! Lighthouse 执行器 - 基础设施层
//!
//! 只负责"对已启动的浏览器端口跑一次 Lighthouse"，不关心浏览器从哪来

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::AuditError;
use crate::models::{DeviceProfile, LighthouseReport};

/// 只审计这四个类别
pub const ONLY_CATEGORIES: &str = "performance,accessibility,best-practices,seo";

/// 一次 Lighthouse 运行的产物
#[derive(Debug)]
pub struct LighthouseOutput {
    pub report: LighthouseReport,
    pub html: String,
}

/// Lighthouse 命令行执行器
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    bin: String,
}

impl LighthouseCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// 通过调试端口对 `url` 运行 Lighthouse
    ///
    /// JSON 输出用于读取分数，HTML 输出即报告正文。
    pub async fn run(
        &self,
        url: &str,
        device: DeviceProfile,
        port: u16,
    ) -> Result<LighthouseOutput, AuditError> {
        let workspace = tempfile::Builder::new()
            .prefix("sitemap-audit-lh-")
            .tempdir()
            .map_err(AuditError::Workspace)?;
        let output_base = workspace.path().join("audit");

        let args = build_args(url, device, port, &output_base);
        debug!("{} {}", self.bin, args.join(" "));

        let output = Command::new(&self.bin)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AuditError::SpawnFailed {
                bin: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AuditError::EngineFailed {
                code: output.status.code(),
                stderr: last_lines(&String::from_utf8_lossy(&output.stderr), 5),
            });
        }

        let (json_path, html_path) = output_paths(&output_base);
        let json = read_output(&json_path).await?;
        let html = read_output(&html_path).await?;

        let report: LighthouseReport = serde_json::from_str(&json)?;
        if let Some(err) = &report.runtime_error {
            return Err(AuditError::Runtime {
                code: err.code.clone(),
                message: err.message.clone(),
            });
        }

        Ok(LighthouseOutput { report, html })
    }
}

/// 组装 Lighthouse 命令行参数
pub fn build_args(url: &str, device: DeviceProfile, port: u16, output_base: &Path) -> Vec<String> {
    let mut args = vec![
        url.to_string(),
        format!("--port={}", port),
        format!("--only-categories={}", ONLY_CATEGORIES),
        "--output=json".to_string(),
        "--output=html".to_string(),
        format!("--output-path={}", output_base.display()),
        "--no-enable-error-reporting".to_string(),
        "--quiet".to_string(),
    ];
    args.extend(device.lighthouse_args().iter().map(|a| a.to_string()));
    args
}

/// 多种输出时 Lighthouse 在 output-path 后追加 `.report.<ext>`
pub fn output_paths(output_base: &Path) -> (PathBuf, PathBuf) {
    let base = output_base.display().to_string();
    (
        PathBuf::from(format!("{}.report.json", base)),
        PathBuf::from(format!("{}.report.html", base)),
    )
}

async fn read_output(path: &Path) -> Result<String, AuditError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AuditError::OutputMissing {
            path: path.to_path_buf(),
            source,
        })
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
