// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Blocking WebHDFS REST client
//!
//! Talks to the NameNode HTTP endpoint (`/webhdfs/v1`) using simple
//! `user.name` authentication. Data reads and writes follow the NameNode's
//! 307 redirect to a DataNode by hand, so the redirect target is always
//! visible to the caller's timeout.

use crate::{ConnectError, Result};
use diagnostics::*;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::LOCATION;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const API_PREFIX: &str = "/webhdfs/v1";

/// File or directory as reported by GETFILESTATUS / LISTSTATUS
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub length: u64,
    pub owner: String,
    pub group: String,
    pub permission: String,
    pub modification_time: i64,
    pub access_time: i64,
    pub block_size: u64,
    pub replication: u32,
}

impl FileStatus {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

#[derive(Deserialize)]
struct FileStatusReply {
    #[serde(rename = "FileStatus")]
    file_status: FileStatus,
}

#[derive(Deserialize)]
struct ListReply {
    #[serde(rename = "FileStatuses")]
    file_statuses: FileStatusList,
}

#[derive(Deserialize)]
struct FileStatusList {
    #[serde(rename = "FileStatus")]
    file_status: Vec<FileStatus>,
}

#[derive(Deserialize)]
struct BooleanReply {
    boolean: bool,
}

#[derive(Deserialize)]
struct RemoteExceptionReply {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Deserialize)]
struct RemoteException {
    exception: String,
    message: String,
}

/// Append the service port to a NameNode base address
pub fn namenode_url(base: &str, port: Option<u16>) -> String {
    let base = base.trim_end_matches('/');
    match port {
        Some(port) => format!("{base}:{port}"),
        None => base.to_string(),
    }
}

pub struct WebHdfsClient {
    http: Client,
    base: Url,
    user: Option<String>,
}

impl WebHdfsClient {
    pub fn new(base_url: &str, user: Option<&str>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base,
            user: user.map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// GETFILESTATUS
    pub fn status(&self, path: &str) -> Result<FileStatus> {
        let url = self.op_url(path, "GETFILESTATUS", &[])?;
        let reply: FileStatusReply = self.send(self.http.get(url.clone()), &url)?.json()?;
        Ok(reply.file_status)
    }

    /// Like `status`, but a missing path is `false` rather than an error
    pub fn exists(&self, path: &str) -> Result<bool> {
        match self.status(path) {
            Ok(_) => Ok(true),
            Err(ConnectError::Hdfs { exception, .. }) if exception == "FileNotFoundException" => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// LISTSTATUS
    pub fn list(&self, path: &str) -> Result<Vec<FileStatus>> {
        let url = self.op_url(path, "LISTSTATUS", &[])?;
        let reply: ListReply = self.send(self.http.get(url.clone()), &url)?.json()?;
        Ok(reply.file_statuses.file_status)
    }

    /// OPEN, reading the whole file
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.op_url(path, "OPEN", &[])?;
        let resp = self.send(self.http.get(url.clone()), &url)?;

        let resp = match redirect_target(&resp)? {
            Some(datanode) => {
                let target = datanode.to_string();
                debug!("Reading {path} from DataNode {target}", path, target);
                self.send(self.http.get(datanode.clone()), &datanode)?
            }
            None => resp,
        };
        Ok(resp.bytes()?.to_vec())
    }

    /// Two-step CREATE: the NameNode names a DataNode, the data goes there
    pub fn write(&self, path: &str, data: &[u8], overwrite: bool) -> Result<()> {
        let overwrite = if overwrite { "true" } else { "false" };
        let url = self.op_url(path, "CREATE", &[("overwrite", overwrite)])?;
        let resp = self.send(self.http.put(url.clone()), &url)?;

        let Some(datanode) = redirect_target(&resp)? else {
            return Err(ConnectError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
                body: "expected a DataNode redirect for CREATE".to_string(),
            });
        };

        let target = datanode.to_string();
        debug!("Writing {path} to DataNode {target}", path, target);
        let req = self
            .http
            .put(datanode.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec());
        let _ = self.send(req, &datanode)?;
        Ok(())
    }

    /// MKDIRS
    pub fn mkdirs(&self, path: &str) -> Result<bool> {
        let url = self.op_url(path, "MKDIRS", &[])?;
        let reply: BooleanReply = self.send(self.http.put(url.clone()), &url)?.json()?;
        Ok(reply.boolean)
    }

    /// DELETE
    pub fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        let recursive = if recursive { "true" } else { "false" };
        let url = self.op_url(path, "DELETE", &[("recursive", recursive)])?;
        let reply: BooleanReply = self.send(self.http.delete(url.clone()), &url)?.json()?;
        Ok(reply.boolean)
    }

    /// RENAME
    pub fn rename(&self, from: &str, to: &str) -> Result<bool> {
        check_absolute(to)?;
        let url = self.op_url(from, "RENAME", &[("destination", to)])?;
        let reply: BooleanReply = self.send(self.http.put(url.clone()), &url)?.json()?;
        Ok(reply.boolean)
    }

    fn op_url(&self, path: &str, op: &str, params: &[(&str, &str)]) -> Result<Url> {
        check_absolute(path)?;
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{API_PREFIX}{path}"));
        {
            let mut query = url.query_pairs_mut();
            query.clear().append_pair("op", op);
            for (k, v) in params {
                query.append_pair(k, v);
            }
            if let Some(user) = &self.user {
                query.append_pair("user.name", user);
            }
        }
        Ok(url)
    }

    /// Send and turn any non-2xx/3xx answer into an error
    fn send(&self, req: RequestBuilder, url: &Url) -> Result<Response> {
        let resp = req.send()?;
        let status = resp.status();
        if status.is_success() || status.is_redirection() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        if let Ok(reply) = serde_json::from_str::<RemoteExceptionReply>(&body) {
            return Err(ConnectError::Hdfs {
                exception: reply.remote_exception.exception,
                message: reply.remote_exception.message,
            });
        }
        Err(ConnectError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        })
    }
}

fn redirect_target(resp: &Response) -> Result<Option<Url>> {
    if !matches!(
        resp.status(),
        StatusCode::TEMPORARY_REDIRECT | StatusCode::FOUND | StatusCode::SEE_OTHER
    ) {
        return Ok(None);
    }
    let bad_reply = |body: String| ConnectError::Status {
        status: resp.status().as_u16(),
        url: resp.url().to_string(),
        body,
    };
    let location = resp
        .headers()
        .get(LOCATION)
        .ok_or_else(|| bad_reply("redirect without Location header".to_string()))?
        .to_str()
        .map_err(|e| bad_reply(format!("invalid Location header: {e}")))?;
    let target =
        Url::parse(location).map_err(|e| bad_reply(format!("invalid Location {location:?}: {e}")))?;
    Ok(Some(target))
}

fn check_absolute(path: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConnectError::Configuration(format!(
            "HDFS paths must be absolute, got {path:?}"
        )))
    }
}
