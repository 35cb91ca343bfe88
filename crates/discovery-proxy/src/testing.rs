//! In-memory module proxy for tests.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use chrono::{DateTime, TimeZone, Utc};
use discovery_core::{version, LATEST};
use zip::write::SimpleFileOptions;

use crate::error::{ProxyError, Result};
use crate::escape::{unescape, unescape_path};
use crate::transport::{Response, Transport};

/// Build a zip holding the given (name, contents) entries.
pub(crate) fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// One module version served by [`TestProxy`].
pub(crate) struct TestVersion {
    module_path: String,
    version: String,
    time: DateTime<Utc>,
    zip: Vec<u8>,
}

impl TestVersion {
    /// A version whose zip holds `files` (paths relative to the module root).
    pub(crate) fn new(module_path: &str, version: &str, files: &[(&str, &str)]) -> Self {
        let prefixed: Vec<(String, &str)> = files
            .iter()
            .map(|(name, contents)| (format!("{module_path}@{version}/{name}"), *contents))
            .collect();
        let entries: Vec<(&str, &str)> = prefixed
            .iter()
            .map(|(name, contents)| (name.as_str(), *contents))
            .collect();
        TestVersion {
            module_path: module_path.to_string(),
            version: version.to_string(),
            time: Utc.with_ymd_and_hms(2019, 1, 30, 0, 0, 0).unwrap(),
            zip: build_zip(&entries),
        }
    }

    fn info(&self) -> Response {
        let body = serde_json::json!({ "Version": self.version, "Time": self.time });
        Response::new(200, body.to_string())
    }
}

/// A proxy serving the protocol endpoints from memory.
///
/// Unknown modules answer 404, unknown versions of a known module 410.
pub(crate) struct TestProxy {
    versions: Vec<TestVersion>,
    overrides: HashMap<String, Response>,
}

impl TestProxy {
    pub(crate) fn new(versions: Vec<TestVersion>) -> Self {
        TestProxy {
            versions,
            overrides: HashMap::new(),
        }
    }

    /// The fixture module `github.com/my/module@v1.0.0`.
    pub(crate) fn with_defaults() -> Self {
        TestProxy::new(vec![TestVersion::new(
            "github.com/my/module",
            "v1.0.0",
            &[
                ("LICENSE", "MIT License\n"),
                ("README.md", "README FILE FOR TESTING.\n"),
                ("go.mod", "module github.com/my/module\n"),
                ("foo/foo.go", "// package foo exports a helpful constant.\npackage foo\n\nimport \"net/http\"\n\nconst OK = http.StatusOK\n"),
                ("foo/LICENSE.md", "MIT License\n"),
                ("bar/bar.go", "// package bar\npackage bar\n\n// Bar returns the string \"bar\".\nfunc Bar() string {\n\treturn \"bar\"\n}\n"),
                ("bar/LICENSE", "MIT License\n"),
            ],
        )])
    }

    /// Answer `endpoint` with a fixed response.
    pub(crate) fn with_response(mut self, endpoint: &str, response: Response) -> Self {
        self.overrides.insert(endpoint.to_string(), response);
        self
    }

    fn serve(&self, endpoint: &str) -> Response {
        if let Some(response) = self.overrides.get(endpoint) {
            return response.clone();
        }
        let Some((escaped, query)) = endpoint.split_once("/@") else {
            return not_found();
        };
        let Ok(module_path) = unescape_path(escaped) else {
            return Response::new(400, "bad module path");
        };
        let versions: Vec<&TestVersion> = self
            .versions
            .iter()
            .filter(|v| v.module_path == module_path)
            .collect();
        if versions.is_empty() {
            return not_found();
        }

        if query == LATEST {
            let latest = version::latest(versions.iter().map(|v| v.version.as_str()));
            return match versions.iter().find(|v| Some(v.version.as_str()) == latest) {
                Some(v) => v.info(),
                None => not_found(),
            };
        }
        if query == "v/list" {
            let body: String = versions.iter().map(|v| format!("{}\n", v.version)).collect();
            return Response::new(200, body);
        }

        let Some((escaped_version, ext)) = query
            .strip_prefix("v/")
            .and_then(|file| file.rsplit_once('.'))
        else {
            return not_found();
        };
        let Some(found) = unescape(escaped_version)
            .and_then(|ver| versions.iter().find(|v| v.version == ver).copied())
        else {
            return Response::new(410, "gone");
        };
        match ext {
            "info" => found.info(),
            "zip" => Response::new(200, found.zip.clone()),
            _ => not_found(),
        }
    }
}

fn not_found() -> Response {
    Response::new(404, "not found")
}

#[async_trait::async_trait]
impl Transport for TestProxy {
    async fn get(&self, endpoint: &str) -> Result<Response> {
        Ok(self.serve(endpoint))
    }
}

/// A transport whose requests never complete.
pub(crate) struct Stalled;

#[async_trait::async_trait]
impl Transport for Stalled {
    async fn get(&self, _endpoint: &str) -> Result<Response> {
        std::future::pending::<Result<Response>>().await
    }
}

/// A transport whose connections always fail.
pub(crate) struct Unreachable;

#[async_trait::async_trait]
impl Transport for Unreachable {
    async fn get(&self, endpoint: &str) -> Result<Response> {
        Err(ProxyError::transport(endpoint, "connection refused"))
    }
}
