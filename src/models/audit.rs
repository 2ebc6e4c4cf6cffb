use crate::models::device::DeviceProfile;

/// 满分
pub const MAX_SCORE: f64 = 100.0;

/// 审计类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl Category {
    /// 固定顺序，与 Lighthouse 报告中的顺序一致
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::Accessibility,
        Category::BestPractices,
        Category::Seo,
    ];

    /// Lighthouse 类别 id，同时用作目录名
    pub fn id(self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::Accessibility => "accessibility",
            Category::BestPractices => "best-practices",
            Category::Seo => "seo",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// 分数区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBucket {
    Low,
    Medium,
    High,
}

impl ScoreBucket {
    /// 半开区间：`< 50` → 0-49，`< 90` → 50-89，其余 → 90-100
    pub fn for_score(score: f64) -> Self {
        if score < 50.0 {
            ScoreBucket::Low
        } else if score < 90.0 {
            ScoreBucket::Medium
        } else {
            ScoreBucket::High
        }
    }

    /// 目录名
    pub fn label(self) -> &'static str {
        match self {
            ScoreBucket::Low => "0-49",
            ScoreBucket::Medium => "50-89",
            ScoreBucket::High => "90-100",
        }
    }
}

impl std::fmt::Display for ScoreBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 将 Lighthouse 的 [0,1] 分数换算为 [0,100]
///
/// `None`（Lighthouse 中类别出错时为 null）按 0 处理。
/// 结果保留两位小数并限制在 [0,100] 内。
pub fn scale_score(fraction: Option<f64>) -> f64 {
    let raw = fraction.filter(|v| v.is_finite()).unwrap_or(0.0) * MAX_SCORE;
    ((raw * 100.0).round() / 100.0).clamp(0.0, MAX_SCORE)
}

/// 四个类别的分数（0-100）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScores {
    pub performance: f64,
    pub accessibility: f64,
    pub best_practices: f64,
    pub seo: f64,
}

impl CategoryScores {
    pub fn new(performance: f64, accessibility: f64, best_practices: f64, seo: f64) -> Self {
        Self {
            performance,
            accessibility,
            best_practices,
            seo,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Performance => self.performance,
            Category::Accessibility => self.accessibility,
            Category::BestPractices => self.best_practices,
            Category::Seo => self.seo,
        }
    }

    /// 按固定顺序迭代 (类别, 分数)
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// 是否有任意分数低于满分
    pub fn any_below_max(&self) -> bool {
        self.iter().any(|(_, score)| score < MAX_SCORE)
    }

    /// 低于满分的类别
    pub fn below_max(&self) -> Vec<(Category, f64)> {
        self.iter().filter(|(_, score)| *score < MAX_SCORE).collect()
    }
}

impl std::fmt::Display for CategoryScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P{} A{} B{} S{}",
            self.performance, self.accessibility, self.best_practices, self.seo
        )
    }
}

/// 一次审计（URL × 设备）的结果
#[derive(Debug, Clone)]
pub struct AuditResult {
    pub url: String,
    pub device: DeviceProfile,
    pub scores: CategoryScores,
    /// 渲染好的 HTML 报告
    pub report_html: String,
}
