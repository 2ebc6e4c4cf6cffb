//! 审计上下文
//!
//! 封装"正在审计第几个 URL 的哪个设备"这一信息

use std::fmt::Display;

use crate::models::DeviceProfile;

/// 单次审计的上下文
#[derive(Debug, Clone)]
pub struct AuditCtx {
    /// 页面 URL
    pub url: String,

    /// URL 在 sitemap 中的序号（从1开始，仅用于日志）
    pub url_index: usize,

    /// URL 总数（仅用于日志）
    pub url_total: usize,

    /// 设备配置
    pub device: DeviceProfile,
}

impl AuditCtx {
    pub fn new(url: String, url_index: usize, url_total: usize, device: DeviceProfile) -> Self {
        Self {
            url,
            url_index,
            url_total,
            device,
        }
    }
}

impl Display for AuditCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{} {}]",
            self.url_index, self.url_total, self.device
        )
    }
}
