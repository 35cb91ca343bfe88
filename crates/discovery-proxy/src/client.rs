//! The proxy client.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use discovery_core::{Context, VersionInfo, LATEST};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::archive::RawArchive;
use crate::config::ClientConfig;
use crate::error::{ProxyError, Result};
use crate::escape::{escape_path, escape_version};
use crate::transport::{HttpTransport, Transport};

/// `.info` and `@latest` response body.
#[derive(Debug, Deserialize)]
struct InfoBody {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Time")]
    time: DateTime<Utc>,
}

/// A module proxy client.
///
/// Holds no state besides its transport, so one client can serve any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
}

impl Client<HttpTransport> {
    /// Create an HTTP client for the configured proxy.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Client::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Client { transport }
    }

    /// Fetch version info for `version`, or for the proxy's latest
    /// version when `version` is [`LATEST`].
    pub async fn get_info(
        &self,
        ctx: &Context,
        module_path: &str,
        version: &str,
    ) -> Result<VersionInfo> {
        let module = escape_path(module_path)?;
        let endpoint = if version == LATEST {
            format!("{module}/@latest")
        } else {
            format!("{module}/@v/{}.info", escape_version(version)?)
        };

        let body = self.fetch(ctx, &endpoint).await?;
        let info: InfoBody = serde_json::from_slice(&body)
            .map_err(|e| ProxyError::protocol(&endpoint, format!("decoding info: {e}")))?;
        if info.version.is_empty() {
            return Err(ProxyError::protocol(&endpoint, "empty version"));
        }

        Ok(VersionInfo {
            module_path: module_path.to_string(),
            version: info.version,
            time: info.time,
        })
    }

    /// List the versions the proxy knows for a module, in proxy order.
    pub async fn list_versions(&self, ctx: &Context, module_path: &str) -> Result<Vec<String>> {
        let endpoint = format!("{}/@v/list", escape_path(module_path)?);
        let body = self.fetch(ctx, &endpoint).await?;
        let text = std::str::from_utf8(&body)
            .map_err(|e| ProxyError::protocol(&endpoint, format!("version list is not UTF-8: {e}")))?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Download and unpack the zip of one module version.
    pub async fn get_zip(&self, ctx: &Context, module_path: &str, version: &str) -> Result<RawArchive> {
        if version == LATEST {
            return Err(ProxyError::InvalidArgument {
                detail: "a module zip needs a concrete version".to_string(),
            });
        }
        let endpoint = format!(
            "{}/@v/{}.zip",
            escape_path(module_path)?,
            escape_version(version)?
        );
        let body = self.fetch(ctx, &endpoint).await?;
        let archive = RawArchive::from_zip(module_path, version, &body).inspect_err(|e| {
            warn!(module_path, version, error = %e, "rejected module zip");
        })?;
        debug!(module_path, version, files = archive.len(), "fetched module zip");
        Ok(archive)
    }

    /// GET an endpoint under `ctx` and map the status onto an error kind.
    async fn fetch(&self, ctx: &Context, endpoint: &str) -> Result<Bytes> {
        let response = ctx.run(self.transport.get(endpoint)).await??;
        match response.status {
            200..=299 => Ok(response.body),
            404 | 410 => {
                debug!(endpoint, status = response.status, "not found");
                Err(ProxyError::NotFound {
                    resource: endpoint.to_string(),
                })
            }
            status @ 400..=499 => {
                warn!(endpoint, status, "unexpected client error status");
                Err(ProxyError::protocol(
                    endpoint,
                    format!("unexpected status {status}: {}", body_excerpt(&response.body)),
                ))
            }
            status => {
                warn!(endpoint, status, "proxy error status");
                Err(ProxyError::transport(
                    endpoint,
                    format!("status {status}: {}", body_excerpt(&response.body)),
                ))
            }
        }
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{Stalled, TestProxy, TestVersion, Unreachable};
    use crate::transport::Response;
    use chrono::TimeZone;
    use discovery_core::ErrorKind;

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn ctx() -> Context {
        Context::background().with_timeout(TEST_TIMEOUT)
    }

    fn bar_versions() -> Vec<TestVersion> {
        vec![
            TestVersion::new("foo.com/bar", "v1.1.0", &[("bar.go", "package bar\nconst Version = 1.1")]),
            TestVersion::new("foo.com/bar", "v1.2.0", &[("bar.go", "package bar\nconst Version = 1.2")]),
        ]
    }

    async fn list_error(client: &Client<TestProxy>, module: &str) -> ErrorKind {
        client.list_versions(&ctx(), module).await.unwrap_err().kind()
    }

    #[tokio::test]
    async fn get_latest_info() {
        let client = Client::with_transport(TestProxy::new(bar_versions()));
        let info = client.get_info(&ctx(), "foo.com/bar", LATEST).await.unwrap();
        assert_eq!(info.version, "v1.2.0");
        assert_eq!(info.module_path, "foo.com/bar");
    }

    #[tokio::test]
    async fn latest_prefers_release_over_higher_prerelease() {
        let client = Client::with_transport(TestProxy::new(vec![
            TestVersion::new("foo.com/bar", "v1.0.0", &[("bar.go", "package bar")]),
            TestVersion::new("foo.com/bar", "v2.0.0-beta.1", &[("bar.go", "package bar")]),
        ]));
        let info = client.get_info(&ctx(), "foo.com/bar", LATEST).await.unwrap();
        assert_eq!(info.version, "v1.0.0");
    }

    #[tokio::test]
    async fn list_versions_excludes_sibling_module() {
        let mut versions = bar_versions();
        versions.push(TestVersion::new(
            "foo.com/baz",
            "v1.3.0",
            &[("baz.go", "package bar\nconst Version = 1.3")],
        ));
        let client = Client::with_transport(TestProxy::new(versions));

        let got = client.list_versions(&ctx(), "foo.com/bar").await.unwrap();
        assert_eq!(got, vec!["v1.1.0", "v1.2.0"]);
    }

    #[tokio::test]
    async fn list_versions_empty_and_unknown() {
        let client = Client::with_transport(
            TestProxy::new(bar_versions())
                .with_response("foo.com/empty/@v/list", Response::new(200, "")),
        );
        assert!(client
            .list_versions(&ctx(), "foo.com/empty")
            .await
            .unwrap()
            .is_empty());

        let err = client.list_versions(&ctx(), "foo.com/unknown").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_versions_skips_blank_lines() {
        let client = Client::with_transport(TestProxy::new(bar_versions()).with_response(
            "foo.com/padded/@v/list",
            Response::new(200, "v1.0.0\n\n  v1.1.0\r\n"),
        ));
        let got = client.list_versions(&ctx(), "foo.com/padded").await.unwrap();
        assert_eq!(got, vec!["v1.0.0", "v1.1.0"]);
    }

    #[tokio::test]
    async fn get_info_concrete_version() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let info = client
            .get_info(&ctx(), "github.com/my/module", "v1.0.0")
            .await
            .unwrap();
        assert_eq!(info.version, "v1.0.0");
        assert_eq!(info.time, Utc.with_ymd_and_hms(2019, 1, 30, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn get_info_version_does_not_exist() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let err = client
            .get_info(&ctx(), "github.com/my/module", "v3.0.0")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn get_zip() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let archive = client
            .get_zip(&ctx(), "github.com/my/module", "v1.0.0")
            .await
            .unwrap();

        let mut got: Vec<&str> = archive.paths().collect();
        got.sort();
        let mut want = vec![
            "github.com/my/module@v1.0.0/LICENSE",
            "github.com/my/module@v1.0.0/README.md",
            "github.com/my/module@v1.0.0/go.mod",
            "github.com/my/module@v1.0.0/foo/foo.go",
            "github.com/my/module@v1.0.0/foo/LICENSE.md",
            "github.com/my/module@v1.0.0/bar/bar.go",
            "github.com/my/module@v1.0.0/bar/LICENSE",
        ];
        want.sort();
        assert_eq!(got, want);
        assert!(archive
            .paths()
            .all(|p| p.starts_with("github.com/my/module@v1.0.0/")));
    }

    #[tokio::test]
    async fn get_zip_nonexistent_module() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let err = client
            .get_zip(&ctx(), "my.mod/nonexistmodule", "v1.0.0")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn get_zip_rejects_latest() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let err = client
            .get_zip(&ctx(), "github.com/my/module", LATEST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn get_zip_with_foreign_entries() {
        let zip = crate::testing::build_zip(&[("github.com/other@v1.0.0/go.mod", "module github.com/other\n")]);
        let client = Client::with_transport(
            TestProxy::with_defaults()
                .with_response("github.com/my/module/@v/v1.0.0.zip", Response::new(200, zip)),
        );
        let err = client
            .get_zip(&ctx(), "github.com/my/module", "v1.0.0")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    }

    #[tokio::test]
    async fn malformed_info_body() {
        let client = Client::with_transport(
            TestProxy::with_defaults()
                .with_response("github.com/my/module/@latest", Response::new(200, "{not json"))
                .with_response(
                    "github.com/my/module/@v/v1.0.0.info",
                    Response::new(200, r#"{"Version":"","Time":"2019-01-30T00:00:00Z"}"#),
                ),
        );
        let err = client
            .get_info(&ctx(), "github.com/my/module", LATEST)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);

        let err = client
            .get_info(&ctx(), "github.com/my/module", "v1.0.0")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    }

    #[tokio::test]
    async fn status_mapping() {
        let client = Client::with_transport(
            TestProxy::with_defaults()
                .with_response("a.com/gone/@v/list", Response::new(410, "gone"))
                .with_response("a.com/busy/@v/list", Response::new(503, "try later"))
                .with_response("a.com/denied/@v/list", Response::new(403, "forbidden")),
        );
        assert_eq!(list_error(&client, "a.com/gone").await, ErrorKind::NotFound);
        assert_eq!(list_error(&client, "a.com/busy").await, ErrorKind::Transport);
        assert_eq!(
            list_error(&client, "a.com/denied").await,
            ErrorKind::ProtocolViolation
        );
    }

    #[tokio::test]
    async fn escapes_upper_case_module_paths() {
        let client = Client::with_transport(TestProxy::new(vec![TestVersion::new(
            "github.com/Azure/go-autorest",
            "v1.0.0",
            &[("go.mod", "module github.com/Azure/go-autorest\n")],
        )]));
        let versions = client
            .list_versions(&ctx(), "github.com/Azure/go-autorest")
            .await
            .unwrap();
        assert_eq!(versions, vec!["v1.0.0"]);

        let archive = client
            .get_zip(&ctx(), "github.com/Azure/go-autorest", "v1.0.0")
            .await
            .unwrap();
        assert!(archive.file("go.mod").is_some());
    }

    #[tokio::test]
    async fn invalid_arguments() {
        let client = Client::with_transport(TestProxy::with_defaults());
        let err = client.get_info(&ctx(), "/bad/path", LATEST).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = client
            .get_info(&ctx(), "github.com/my/module", "1.0.0")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn transport_failure() {
        let client = Client::with_transport(Unreachable);
        let err = client.list_versions(&ctx(), "foo.com/bar").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn canceled_context() {
        let client = Client::with_transport(Stalled);
        let ctx = Context::background().with_cancel();
        ctx.cancel();
        let err = client.get_info(&ctx, "foo.com/bar", LATEST).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Canceled);
    }

    #[tokio::test]
    async fn deadline_exceeded() {
        let client = Client::with_transport(Stalled);
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let err = client
            .get_zip(&ctx, "foo.com/bar", "v1.0.0")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
        assert!(!err.is_not_found());
    }
}
