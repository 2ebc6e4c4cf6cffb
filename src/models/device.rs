/// 设备配置（Lighthouse form factor）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceProfile {
    /// 移动端：Lighthouse 默认的移动端模拟与节流
    Mobile,
    /// 桌面端：关闭屏幕模拟
    Desktop,
}

impl DeviceProfile {
    /// 每个 URL 的审计顺序：先 mobile，后 desktop
    pub const ALL: [DeviceProfile; 2] = [DeviceProfile::Mobile, DeviceProfile::Desktop];

    /// Lighthouse 使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceProfile::Mobile => "mobile",
            DeviceProfile::Desktop => "desktop",
        }
    }

    /// 对应的 Lighthouse 命令行参数
    pub fn lighthouse_args(self) -> &'static [&'static str] {
        match self {
            DeviceProfile::Mobile => &["--form-factor=mobile"],
            DeviceProfile::Desktop => &["--form-factor=desktop", "--screenEmulation.disabled"],
        }
    }
}

impl std::fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
