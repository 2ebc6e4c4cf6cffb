//! Lighthouse JSON 结果（LHR）中用到的部分

use crate::models::audit::{scale_score, CategoryScores};
use serde::Deserialize;

/// 单个类别
#[derive(Debug, Deserialize, Clone)]
pub struct LhrCategory {
    pub score: Option<f64>,
}

/// 四个审计类别
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LhrCategories {
    pub performance: Option<LhrCategory>,
    pub accessibility: Option<LhrCategory>,
    #[serde(rename = "best-practices")]
    pub best_practices: Option<LhrCategory>,
    pub seo: Option<LhrCategory>,
}

/// Lighthouse 运行时错误（页面打不开等）
#[derive(Debug, Deserialize, Clone)]
pub struct LhrRuntimeError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseReport {
    /// 跳转后的最终地址
    #[serde(default)]
    pub final_url: Option<String>,
    #[serde(default)]
    pub categories: LhrCategories,
    #[serde(default)]
    pub runtime_error: Option<LhrRuntimeError>,
}

impl LighthouseReport {
    /// 换算为 0-100 的分数
    pub fn scores(&self) -> CategoryScores {
        let score = |c: &Option<LhrCategory>| scale_score(c.as_ref().and_then(|c| c.score));
        CategoryScores::new(
            score(&self.categories.performance),
            score(&self.categories.accessibility),
            score(&self.categories.best_practices),
            score(&self.categories.seo),
        )
    }

    /// 最终地址与审计地址不同时返回最终地址
    pub fn redirected_from(&self, url: &str) -> Option<&str> {
        self.final_url
            .as_deref()
            .filter(|final_url| !final_url.is_empty() && *final_url != url)
    }
}
