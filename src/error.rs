//! 错误类型
//!
//! 按职责划分：sitemap、浏览器、审计、报告写入。
//! 只有 [`ReportError`] 会终止整个运行，其余错误都在各自的层内记录并吞掉。

use std::path::PathBuf;
use thiserror::Error;

/// sitemap 拉取 / 解析错误
#[derive(Debug, Error)]
pub enum SitemapError {
    /// HTTP 客户端创建失败
    #[error("创建 HTTP 客户端失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),
    /// 网络请求失败
    #[error("请求 sitemap 失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 返回了非 2xx 状态码
    #[error("sitemap 返回错误状态码 ({url}): {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// XML 格式错误
    #[error("sitemap XML 解析失败: {0}")]
    MalformedXml(#[from] quick_xml::Error),
    /// 根元素不是 urlset
    #[error("sitemap 根元素应为 urlset，实际为 {found:?}")]
    UnexpectedRoot { found: Option<String> },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动无头浏览器失败: {0}")]
    LaunchFailed(#[from] chromiumoxide::error::CdpError),
    /// 无法从 websocket 地址中得到调试端口
    #[error("无法解析浏览器调试端口: {address}")]
    PortUnavailable { address: String },
    /// 创建临时用户目录失败
    #[error("创建浏览器临时目录失败: {0}")]
    ProfileDirFailed(#[source] std::io::Error),
}

/// 单次审计（一个 URL × 一个设备）的错误
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Browser(#[from] BrowserError),
    /// 无法启动 Lighthouse 进程
    #[error("无法启动 Lighthouse ({bin}): {source}")]
    SpawnFailed {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    /// Lighthouse 非零退出
    #[error("Lighthouse 执行失败 (退出码 {code:?}): {stderr}")]
    EngineFailed { code: Option<i32>, stderr: String },
    /// 找不到 Lighthouse 输出文件
    #[error("读取 Lighthouse 输出失败 ({path}): {source}")]
    OutputMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Lighthouse JSON 结果解析失败
    #[error("Lighthouse 结果解析失败: {0}")]
    InvalidResult(#[from] serde_json::Error),
    /// Lighthouse 报告了运行时错误（例如页面无法打开）
    #[error("Lighthouse 运行时错误 {code}: {message}")]
    Runtime { code: String, message: String },
    /// 临时输出目录创建失败
    #[error("创建 Lighthouse 输出目录失败: {0}")]
    Workspace(#[source] std::io::Error),
}

/// 报告写入错误（致命）
#[derive(Debug, Error)]
pub enum ReportError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入报告失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
