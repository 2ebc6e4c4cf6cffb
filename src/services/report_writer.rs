//! 报告写入服务 - 业务能力层
//!
//! 只负责"决定是否保存、保存到哪里、写文件"，不关心审计怎么跑

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::error::ReportError;
use crate::models::{AuditResult, Category, CategoryScores, DeviceProfile, ScoreBucket};

/// 根路径 URL 的内容类型目录
pub const FALLBACK_SEGMENT: &str = "general";
/// 没有路径段时的文件名
pub const FALLBACK_PAGE: &str = "index";

/// 报告保存策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// 任意分数低于 100 时保存一份完整报告，文件名包含四个分数
    #[default]
    WholeReport,
    /// 每个低于 100 的类别各保存一份，按类别和分数区间分目录
    PerCategory,
}

impl SavePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" | "whole-report" | "a" => Some(SavePolicy::WholeReport),
            "per-category" | "category" | "b" => Some(SavePolicy::PerCategory),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SavePolicy::WholeReport => "whole",
            SavePolicy::PerCategory => "per-category",
        }
    }
}

impl std::fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 报告目标位置（纯计算结果，不缓存）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDestination {
    /// 仅 PerCategory 策略下有值
    pub category: Option<Category>,
    pub dir: PathBuf,
    pub file_name: String,
}

impl ReportDestination {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// 保存结果，`written` 为空表示全部满分而跳过
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub written: Vec<PathBuf>,
}

impl SaveOutcome {
    pub fn is_skipped(&self) -> bool {
        self.written.is_empty()
    }
}

/// 报告写入服务
///
/// 职责：
/// - 按策略计算报告位置
/// - 创建目录并写入 HTML
/// - 不处理审计失败（失败的审计不会到这里）
pub struct ReportWriter {
    base_dir: PathBuf,
    policy: SavePolicy,
}

impl ReportWriter {
    pub fn new(base_dir: impl Into<PathBuf>, policy: SavePolicy) -> Self {
        Self {
            base_dir: base_dir.into(),
            policy,
        }
    }

    /// 按当前月份保存
    pub async fn save(&self, result: &AuditResult) -> Result<SaveOutcome, ReportError> {
        self.save_for_month(result, &current_month()).await
    }

    /// 按指定月份（`yyyy-MM`）保存
    pub async fn save_for_month(
        &self,
        result: &AuditResult,
        month: &str,
    ) -> Result<SaveOutcome, ReportError> {
        let targets = destinations(
            self.policy,
            &self.base_dir,
            &result.url,
            result.device,
            &result.scores,
            month,
        );

        if targets.is_empty() {
            info!(
                "所有分数均为 100，不生成报告: {} ({})",
                result.url, result.device
            );
            return Ok(SaveOutcome::default());
        }

        let mut outcome = SaveOutcome::default();
        for target in targets {
            let path = target.path();
            write_report(&target.dir, &path, &result.report_html).await?;
            match target.category {
                Some(category) => info!(
                    "报告已保存 [{} {}]: {}",
                    category,
                    result.scores.get(category),
                    path.display()
                ),
                None => info!("报告已保存: {}", path.display()),
            }
            outcome.written.push(path);
        }

        Ok(outcome)
    }
}

async fn write_report(dir: &Path, path: &Path, body: &str) -> Result<(), ReportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ReportError::CreateDirFailed {
            path: dir.to_path_buf(),
            source,
        })?;
    debug!("写入 {} 字节到 {}", body.len(), path.display());
    tokio::fs::write(path, body)
        .await
        .map_err(|source| ReportError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// 当前月份，格式 `yyyy-MM`
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// 计算所有需要写入的报告位置
///
/// 纯函数：相同输入（包括月份）总是得到相同输出。
pub fn destinations(
    policy: SavePolicy,
    base_dir: &Path,
    url: &str,
    device: DeviceProfile,
    scores: &CategoryScores,
    month: &str,
) -> Vec<ReportDestination> {
    let content_dir = base_dir.join(month).join(content_segment(url));

    match policy {
        SavePolicy::WholeReport => {
            if !scores.any_below_max() {
                return Vec::new();
            }
            vec![ReportDestination {
                category: None,
                dir: content_dir,
                file_name: whole_report_file_name(url, device, scores),
            }]
        }
        SavePolicy::PerCategory => {
            let file_name = category_file_name(url, device);
            scores
                .below_max()
                .into_iter()
                .map(|(category, score)| ReportDestination {
                    category: Some(category),
                    dir: content_dir
                        .join(category.id())
                        .join(ScoreBucket::for_score(score).label()),
                    file_name: file_name.clone(),
                })
                .collect()
        }
    }
}

/// URL 的第一个非空路径段，根路径时为 `general`
pub fn content_segment(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.find(|s| !s.is_empty()).map(sanitize))
        })
        .unwrap_or_else(|| FALLBACK_SEGMENT.to_string())
}

/// `report_{device}_{path}_P{p}_A{a}_B{b}_S{s}.html`
///
/// `{path}` 为 URL 路径中的 `/` 替换为 `_`
pub fn whole_report_file_name(url: &str, device: DeviceProfile, scores: &CategoryScores) -> String {
    let base_name = match Url::parse(url) {
        Ok(u) => sanitize(&u.path().replace('/', "_")),
        Err(_) => sanitize(url),
    };
    format!(
        "report_{}_{}_P{}_A{}_B{}_S{}.html",
        device,
        base_name,
        scores.performance,
        scores.accessibility,
        scores.best_practices,
        scores.seo
    )
}

/// `{最后一个非空路径段|index}_{device}.html`
pub fn category_file_name(url: &str, device: DeviceProfile) -> String {
    let page = match Url::parse(url) {
        Ok(u) => u
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(sanitize))
            .unwrap_or_else(|| FALLBACK_PAGE.to_string()),
        Err(_) => sanitize(url),
    };
    format!("{}_{}.html", page, device)
}

/// `[A-Za-z0-9._-]` 以外的字符替换为 `_`
pub fn sanitize(raw: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid pattern"));
    let cleaned = re.replace_all(raw, "_").into_owned();
    // 避免生成 "." / ".." 这样的路径段
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}
