#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;
use sitemap_audit::{AuditError, AuditResult, Auditor, CategoryScores, DeviceProfile};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PERFECT: CategoryScores = CategoryScores {
    performance: 100.0,
    accessibility: 100.0,
    best_practices: 100.0,
    seo: 100.0,
};

/// 按 (URL, 设备) 返回预设结果的审计实现，并记录调用顺序
pub struct ScriptedAuditor {
    rules: Vec<(String, DeviceProfile, Option<CategoryScores>)>,
    default_scores: CategoryScores,
    calls: Mutex<Vec<(String, DeviceProfile)>>,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
}

impl ScriptedAuditor {
    pub fn new(default_scores: CategoryScores) -> Self {
        Self {
            rules: Vec::new(),
            default_scores,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            overlapped: AtomicBool::new(false),
        }
    }

    /// `None` 表示该次审计失败
    pub fn with_rule(
        mut self,
        url: &str,
        device: DeviceProfile,
        scores: Option<CategoryScores>,
    ) -> Self {
        self.rules.push((url.to_string(), device, scores));
        self
    }

    pub fn calls(&self) -> Vec<(String, DeviceProfile)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Auditor for ScriptedAuditor {
    async fn audit(&self, url: &str, device: DeviceProfile) -> Result<AuditResult, AuditError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.lock().unwrap().push((url.to_string(), device));

        // 给潜在的并发调用留出交错的机会
        tokio::time::sleep(Duration::from_millis(5)).await;

        let scores = self
            .rules
            .iter()
            .find(|(u, d, _)| u == url && *d == device)
            .map(|(_, _, s)| *s)
            .unwrap_or(Some(self.default_scores));

        self.in_flight.store(false, Ordering::SeqCst);

        match scores {
            Some(scores) => Ok(AuditResult {
                url: url.to_string(),
                device,
                scores,
                report_html: format!("<html><body>{} {}</body></html>", url, device),
            }),
            None => Err(AuditError::EngineFailed {
                code: Some(1),
                stderr: "Runtime error encountered: navigation timeout".to_string(),
            }),
        }
    }
}

pub fn sitemap_xml(urls: &[&str]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("  <url><loc>{}</loc></url>\n", u))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        entries
    )
}

/// 启动一个返回指定内容的 sitemap 服务
pub async fn serve_sitemap(status: u16, body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// 启动一个使用自签名证书的 HTTPS sitemap 服务，返回 sitemap 地址
pub async fn serve_sitemap_tls(body: String) -> String {
    let acceptor = TlsAcceptor::from(Arc::new(self_signed_server_config()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let body = body.clone();
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    format!("https://127.0.0.1:{}/sitemap.xml", port)
}

fn self_signed_server_config() -> ServerConfig {
    let cert = CertificateDer::from(include_bytes!("../fixtures/self_signed_cert.der").to_vec());
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        include_bytes!("../fixtures/self_signed_key.der").to_vec(),
    ));
    ServerConfig::builder_with_provider(Arc::new(
        tokio_rustls::rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert], key)
    .unwrap()
}

/// 递归列出目录下的所有文件
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(list_files(&path));
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// 收集当前线程的日志输出
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// 在返回的 guard 存活期间，当前线程的日志写入这里
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
