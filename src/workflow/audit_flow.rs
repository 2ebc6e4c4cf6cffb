//! 审计流程 - 流程层
//!
//! 核心职责：定义"一个 URL × 一个设备"的完整处理流程
//!
//! 流程顺序：
//! 1. 审计（失败则记录日志并跳过）
//! 2. 按策略保存报告（写入失败向上传播）

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::services::{Auditor, ReportWriter};
use crate::workflow::audit_ctx::AuditCtx;

/// 单次审计的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// 写入了 n 份报告
    Saved(usize),
    /// 全部满分，未写入
    Perfect,
    /// 审计失败，已跳过
    Failed,
}

/// 审计流程
///
/// - 编排审计与保存
/// - 隔离单次审计的失败
/// - 不持有浏览器（浏览器由审计能力自己管理）
pub struct AuditFlow {
    auditor: Arc<dyn Auditor>,
    writer: ReportWriter,
}

impl AuditFlow {
    pub fn new(auditor: Arc<dyn Auditor>, writer: ReportWriter) -> Self {
        Self { auditor, writer }
    }

    pub async fn run(&self, ctx: &AuditCtx) -> Result<AuditOutcome> {
        let result = match self.auditor.audit(&ctx.url, ctx.device).await {
            Ok(result) => result,
            Err(e) => {
                error!("{} ❌ Lighthouse 审计失败 {}: {}", ctx, ctx.url, e);
                return Ok(AuditOutcome::Failed);
            }
        };

        info!("{} 分数: {}", ctx, result.scores);

        let outcome = self
            .writer
            .save(&result)
            .await
            .with_context(|| format!("保存报告失败: {} ({})", ctx.url, ctx.device))?;

        if outcome.is_skipped() {
            Ok(AuditOutcome::Perfect)
        } else {
            Ok(AuditOutcome::Saved(outcome.written.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use crate::models::{AuditResult, CategoryScores, DeviceProfile};
    use crate::services::SavePolicy;
    use async_trait::async_trait;

    struct FixedAuditor {
        scores: Option<CategoryScores>,
    }

    #[async_trait]
    impl Auditor for FixedAuditor {
        async fn audit(
            &self,
            url: &str,
            device: DeviceProfile,
        ) -> Result<AuditResult, AuditError> {
            match self.scores {
                Some(scores) => Ok(AuditResult {
                    url: url.to_string(),
                    device,
                    scores,
                    report_html: "<html></html>".to_string(),
                }),
                None => Err(AuditError::EngineFailed {
                    code: Some(1),
                    stderr: "navigation timeout".to_string(),
                }),
            }
        }
    }

    fn ctx() -> AuditCtx {
        AuditCtx::new(
            "https://example.com/blog/a".to_string(),
            1,
            1,
            DeviceProfile::Mobile,
        )
    }

    fn flow(scores: Option<CategoryScores>, dir: &std::path::Path) -> AuditFlow {
        AuditFlow::new(
            Arc::new(FixedAuditor { scores }),
            ReportWriter::new(dir, SavePolicy::PerCategory),
        )
    }

    #[tokio::test]
    async fn test_failed_audit_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = flow(None, dir.path()).run(&ctx()).await.unwrap();
        assert_eq!(outcome, AuditOutcome::Failed);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_perfect_scores_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let scores = CategoryScores::new(100.0, 100.0, 100.0, 100.0);
        let outcome = flow(Some(scores), dir.path()).run(&ctx()).await.unwrap();
        assert_eq!(outcome, AuditOutcome::Perfect);
    }

    #[tokio::test]
    async fn test_saved_counts_reports() {
        let dir = tempfile::tempdir().unwrap();
        let scores = CategoryScores::new(40.0, 100.0, 70.0, 100.0);
        let outcome = flow(Some(scores), dir.path()).run(&ctx()).await.unwrap();
        assert_eq!(outcome, AuditOutcome::Saved(2));
    }

    #[tokio::test]
    async fn test_write_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let scores = CategoryScores::new(40.0, 100.0, 100.0, 100.0);
        let result = flow(Some(scores), &blocker).run(&ctx()).await;
        assert!(result.is_err());
    }
}
