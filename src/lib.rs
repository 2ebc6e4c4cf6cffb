//! # Sitemap Audit
//!
//! 读取 sitemap，对每个 URL 分别以 mobile / desktop 运行 Lighthouse，
//! 有分数低于 100 时把 HTML 报告写入磁盘。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `browser/` - 单次审计独占的无头浏览器（`BrowserSession`）
//! - `infrastructure/` - `LighthouseCli`，对浏览器端口运行 Lighthouse
//!
//! ### ② 业务能力层（Services）
//! - `SitemapService` - 拉取并解析 sitemap
//! - `LighthouseAuditor` - 审计一个 URL × 一个设备
//! - `ReportWriter` - 按策略计算路径并写入报告
//!
//! ### ③ 流程层（Workflow）
//! - `AuditFlow` - 审计 → 保存，隔离单次失败
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 串行遍历所有 URL 与设备，输出统计

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AuditError, BrowserError, ReportError, SitemapError};
pub use models::{AuditResult, Category, CategoryScores, DeviceProfile, ScoreBucket};
pub use orchestrator::{App, RunStats};
pub use services::{Auditor, LighthouseAuditor, ReportWriter, SavePolicy, SitemapService};
pub use workflow::{AuditCtx, AuditFlow, AuditOutcome};
