use crate::services::report_writer::SavePolicy;
use std::path::PathBuf;

/// 程序配置
///
/// 启动时构造一次，之后按值传给各个组件，不使用全局状态
#[derive(Clone, Debug)]
pub struct Config {
    /// 待审计的 sitemap 地址（来自命令行位置参数）
    pub sitemap_url: String,
    /// 报告根目录
    pub reports_dir: PathBuf,
    /// 报告保存策略
    pub save_policy: SavePolicy,
    /// Lighthouse 可执行文件
    pub lighthouse_bin: String,
    /// 浏览器可执行文件（为空时由 chromiumoxide 自动查找）
    pub chrome_executable: Option<PathBuf>,
    /// 拉取 sitemap 的超时时间（秒）
    pub sitemap_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sitemap_url: String::new(),
            reports_dir: PathBuf::from("./lighthouse_reports"),
            save_policy: SavePolicy::WholeReport,
            lighthouse_bin: "lighthouse".to_string(),
            chrome_executable: None,
            sitemap_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退为默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Self {
            sitemap_url: default.sitemap_url,
            reports_dir: lookup("REPORTS_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.reports_dir),
            save_policy: lookup("SAVE_POLICY")
                .and_then(|v| SavePolicy::from_str(&v))
                .unwrap_or(default.save_policy),
            lighthouse_bin: lookup("LIGHTHOUSE_BIN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.lighthouse_bin),
            chrome_executable: lookup("CHROME_EXECUTABLE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            sitemap_timeout_secs: lookup("SITEMAP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.sitemap_timeout_secs),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// 设置 sitemap 地址
    pub fn with_sitemap_url(mut self, sitemap_url: impl Into<String>) -> Self {
        self.sitemap_url = sitemap_url.into();
        self
    }
}
