pub mod audit;
pub mod device;
pub mod lighthouse;

pub use audit::{AuditResult, Category, CategoryScores, ScoreBucket};
pub use device::DeviceProfile;
pub use lighthouse::LighthouseReport;
