// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! SharePoint Online REST client (document libraries and lists)
//!
//! Authentication is app-only: the client id and secret are exchanged for
//! a bearer token once, in [`SharePointClient::new`]. The token is never
//! refreshed. ACS tokens live for about a day, so a client kept around
//! longer than that starts failing with 401 and has to be rebuilt.

mod models;
mod token;

pub use models::{FileEntry, ListPage};
pub use token::AcsTokenResponse;

use crate::config::SharePointConfig;
use crate::{ConnectError, Result};
use diagnostics::*;
use models::{Results, Verbose};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const ODATA_VERBOSE: &str = "application/json;odata=verbose";
const TIMEOUT_SECONDS: u64 = 60;

/// Characters that would end the path or break the literal; `/` and `'` stay as-is
const ODATA_LITERAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct SharePointClient {
    http: Client,
    site: Url,
    token: String,
    page_size: Option<u32>,
}

impl SharePointClient {
    /// Authenticate and build a client for `config.site_url`
    pub fn new(config: &SharePointConfig) -> Result<Self> {
        let site = Url::parse(config.site_url.trim_end_matches('/'))?;
        let host = site
            .host_str()
            .ok_or_else(|| ConnectError::Configuration("site_url has no host".into()))?
            .to_string();

        let token = token::acquire_token(config, &host)?;
        info!("Authenticated to SharePoint site on {host}", host);

        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            site,
            token,
            page_size: config.page_size,
        })
    }

    /// Files directly inside a server-relative folder, e.g. `Shared Documents/exports`
    pub fn list_files(&self, folder: &str) -> Result<Vec<FileEntry>> {
        let url = self.api_url(&format!(
            "web/GetFolderByServerRelativeUrl('{}')/Files",
            odata_literal(folder)
        ))?;
        let reply: Verbose<Results<FileEntry>> = self.get_json(&url)?;
        Ok(reply.d.results)
    }

    /// Raw content of one file
    pub fn download_file(&self, server_relative_url: &str) -> Result<Vec<u8>> {
        let url = self.api_url(&format!(
            "web/GetFileByServerRelativeUrl('{}')/$value",
            odata_literal(server_relative_url)
        ))?;
        let resp = self.get(&url)?;
        Ok(resp.bytes()?.to_vec())
    }

    /// Download every file of `folder` into `dest`, returning the written paths
    pub fn download_folder(&self, folder: &str, dest: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dest)?;
        let mut written = Vec::new();
        for entry in self.list_files(folder)? {
            let name = &entry.name;
            debug!("Downloading {name}", name);
            let bytes = self.download_file(&entry.server_relative_url)?;
            let path = dest.join(&entry.name);
            std::fs::write(&path, bytes)?;
            written.push(path);
        }
        let count = written.len();
        info!("Downloaded {count} files from {folder}", count, folder);
        Ok(written)
    }

    /// Items of a list, one page per iteration
    ///
    /// Pages are fetched lazily. Iteration stops when a page comes back
    /// without a continuation link, or right after the first error.
    /// Calling this again starts over from the first page.
    pub fn list_items(&self, list_name: &str) -> Result<ListItems<'_>> {
        let mut url = self.api_url(&format!(
            "web/lists/GetByTitle('{}')/items",
            odata_literal(list_name)
        ))?;
        if let Some(top) = self.page_size {
            url.set_query(Some(&format!("$top={top}")));
        }
        Ok(ListItems {
            client: self,
            next: Some(url),
        })
    }

    fn fetch_page(&self, url: &Url) -> Result<(ListPage, Option<Url>)> {
        let reply: Verbose<Results<Map<String, Value>>> = self.get_json(url)?;
        let next = reply.d.next.as_deref().map(Url::parse).transpose()?;
        Ok((ListPage { rows: reply.d.results }, next))
    }

    fn api_url(&self, rest: &str) -> Result<Url> {
        api_url(&self.site, rest)
    }

    fn get(&self, url: &Url) -> Result<Response> {
        let target = url.to_string();
        debug!("GET {target}", target);
        let resp = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, ODATA_VERBOSE)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ConnectError::Status {
                status: status.as_u16(),
                url: target,
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let text = self.get(url)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Lazy iterator over the pages of a SharePoint list
pub struct ListItems<'a> {
    client: &'a SharePointClient,
    next: Option<Url>,
}

impl Iterator for ListItems<'_> {
    type Item = Result<ListPage>;

    fn next(&mut self) -> Option<Result<ListPage>> {
        let url = self.next.take()?;
        match self.client.fetch_page(&url) {
            Ok((page, next)) => {
                self.next = next;
                Some(Ok(page))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// `rest` must already be percent-encoded
fn api_url(site: &Url, rest: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{}/_api/{rest}", site.as_str().trim_end_matches('/')))?)
}

/// Single quotes inside OData string literals are doubled
fn odata_quote(s: &str) -> String {
    s.replace('\'', "''")
}

/// Quoted and percent-encoded, ready to sit between `('` and `')` in a path
fn odata_literal(s: &str) -> String {
    utf8_percent_encode(&odata_quote(s), ODATA_LITERAL).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odata_quote() {
        assert_eq!(odata_quote("Bob's files"), "Bob''s files");
    }

    #[test]
    fn test_odata_literal_escapes_path_breakers() {
        assert_eq!(odata_literal("Documents/exports"), "Documents/exports");
        assert_eq!(odata_literal("Reports #1"), "Reports%20%231");
        assert_eq!(odata_literal("Q1? 50%"), "Q1%3F%2050%25");
        assert_eq!(odata_literal("Bob's"), "Bob''s");
    }

    #[test]
    fn test_api_url_keeps_names_in_path() {
        let site = Url::parse("https://contoso.sharepoint.com/sites/data").unwrap();
        let url = api_url(
            &site,
            &format!("web/GetFolderByServerRelativeUrl('{}')/Files", odata_literal("Reports #1")),
        )
        .unwrap();
        assert_eq!(
            url.path(),
            "/sites/data/_api/web/GetFolderByServerRelativeUrl('Reports%20%231')/Files"
        );
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);

        let url = api_url(
            &site,
            &format!("web/lists/GetByTitle('{}')/items", odata_literal("What? 100%")),
        )
        .unwrap();
        assert_eq!(url.path(), "/sites/data/_api/web/lists/GetByTitle('What%3F%20100%25')/items");
        assert_eq!(url.query(), None);
    }
}
