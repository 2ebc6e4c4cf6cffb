//! sitemap 服务 - 业务能力层
//!
//! 只负责"拿到 URL 列表"能力，失败时返回空列表

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::error::SitemapError;

/// sitemap 服务
///
/// 职责：
/// - 拉取 sitemap（接受自签名证书）
/// - 解析 `urlset/url/loc`
/// - 任何失败都记录日志并返回空列表
pub struct SitemapService {
    client: Client,
}

impl SitemapService {
    /// 创建 sitemap 服务
    pub fn new(timeout: Duration) -> Result<Self, SitemapError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(SitemapError::ClientBuildFailed)?;
        Ok(Self { client })
    }

    /// 拉取并解析 sitemap，失败时返回空列表
    pub async fn fetch_urls(&self, sitemap_url: &str) -> Vec<String> {
        info!("sitemap 地址: {}", sitemap_url);

        match self.try_fetch_urls(sitemap_url).await {
            Ok(urls) => {
                info!("✓ 已找到 {} 个 URL", urls.len());
                urls
            }
            Err(e) => {
                error!("❌ 获取或解析 sitemap 失败: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_urls(&self, sitemap_url: &str) -> Result<Vec<String>, SitemapError> {
        let request_failed = |source| SitemapError::RequestFailed {
            url: sitemap_url.to_string(),
            source,
        };

        let response = self
            .client
            .get(sitemap_url)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::BadStatus {
                url: sitemap_url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(request_failed)?;
        debug!("sitemap 长度: {} 字节", body.len());

        parse_sitemap(&body)
    }
}

/// 解析 sitemap XML，按文档顺序返回所有 `loc`
///
/// 按本地名匹配，忽略命名空间前缀。重复项原样保留。
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut urls = Vec::new();
    let mut root: Option<String> = None;
    let mut depth = 0usize;
    let mut in_url = false;
    let mut in_loc = false;
    let mut loc_taken = false;
    let mut current_loc = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                depth += 1;
                if depth == 1 {
                    if name != "urlset" {
                        return Err(SitemapError::UnexpectedRoot { found: Some(name) });
                    }
                    root = Some(name);
                } else if depth == 2 && name == "url" {
                    in_url = true;
                    loc_taken = false;
                    current_loc.clear();
                } else if depth == 3 && in_url && name == "loc" {
                    if loc_taken {
                        debug!("url 条目包含多个 loc，只保留第一个");
                    } else {
                        in_loc = true;
                    }
                }
            }
            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if depth == 0 {
                    // <urlset/>
                    if name != "urlset" {
                        return Err(SitemapError::UnexpectedRoot { found: Some(name) });
                    }
                    root = Some(name);
                } else if depth == 1 && name == "url" {
                    warn!("sitemap 中的 url 条目缺少 loc，已跳过");
                }
            }
            Event::Text(ref e) => {
                if in_loc {
                    let text = e.unescape().map_err(quick_xml::Error::from)?;
                    current_loc.push_str(text.trim());
                }
            }
            Event::CData(e) => {
                if in_loc {
                    current_loc.push_str(String::from_utf8_lossy(&e.into_inner()).trim());
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if depth == 3 && name == "loc" {
                    if in_loc && !current_loc.is_empty() {
                        loc_taken = true;
                    }
                    in_loc = false;
                } else if depth == 2 && name == "url" && in_url {
                    if current_loc.is_empty() {
                        warn!("sitemap 中的 url 条目缺少 loc，已跳过");
                    } else {
                        urls.push(std::mem::take(&mut current_loc));
                    }
                    in_url = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if root.is_none() {
        return Err(SitemapError::UnexpectedRoot { found: None });
    }

    Ok(urls)
}
