pub mod audit_service;
pub mod report_writer;
pub mod sitemap_service;

pub use audit_service::{Auditor, LighthouseAuditor};
pub use report_writer::{ReportWriter, SaveOutcome, SavePolicy};
pub use sitemap_service::SitemapService;
