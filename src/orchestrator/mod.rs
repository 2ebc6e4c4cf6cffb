//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整批 URL 的调度与统计，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<URL>，每个 URL × {mobile, desktop})
//!     ↓
//! workflow::AuditFlow (处理单次审计)
//!     ↓
//! services (能力层：sitemap / audit / report)
//!     ↓
//! browser + infrastructure (无头浏览器、Lighthouse CLI)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格串行**：一次只有一个审计、一个浏览器
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做保存判断

pub mod batch_processor;

pub use batch_processor::{App, RunStats};
