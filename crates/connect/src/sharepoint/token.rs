// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! App-only token from Azure ACS
//!
//! ACS answers the client-credentials grant with `expires_in` as a string
//! and `token_type` capitalised, neither of which the stock oauth2 token
//! response accepts, hence the dedicated response type.

use crate::config::SharePointConfig;
use crate::{ConnectError, Result};
use oauth2::basic::{
    BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
    BasicTokenType,
};
use oauth2::reqwest::http_client;
use oauth2::{
    AccessToken, AuthType, AuthUrl, ClientId, ClientSecret, RefreshToken, Scope,
    StandardRevocableToken, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Principal id of SharePoint Online in every tenant
const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcsTokenResponse {
    access_token: AccessToken,
    #[serde(deserialize_with = "token_type_any_case")]
    token_type: BasicTokenType,
    #[serde(default, deserialize_with = "super::models::lenient_u64_opt")]
    expires_in: Option<u64>,
}

impl TokenResponse<BasicTokenType> for AcsTokenResponse {
    fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    fn token_type(&self) -> &BasicTokenType {
        &self.token_type
    }

    fn expires_in(&self) -> Option<Duration> {
        self.expires_in.map(Duration::from_secs)
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        None
    }

    fn scopes(&self) -> Option<&Vec<Scope>> {
        None
    }
}

type AcsClient = oauth2::Client<
    BasicErrorResponse,
    AcsTokenResponse,
    BasicTokenType,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

fn token_type_any_case<'de, D>(deserializer: D) -> std::result::Result<BasicTokenType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(match raw.to_ascii_lowercase().as_str() {
        "bearer" => BasicTokenType::Bearer,
        "mac" => BasicTokenType::Mac,
        _ => BasicTokenType::Extension(raw),
    })
}

pub(crate) fn default_token_url(tenant_id: &str) -> String {
    format!("https://accounts.accesscontrol.windows.net/{tenant_id}/tokens/OAuth/2")
}

/// Exchange the app credentials for a bearer token, once
pub(crate) fn acquire_token(config: &SharePointConfig, site_host: &str) -> Result<String> {
    let tenant = &config.tenant_id;
    let token_url = config
        .token_url
        .clone()
        .unwrap_or_else(|| default_token_url(tenant));

    // ACS never sends the user anywhere, but the client insists on an auth URL
    let client = AcsClient::new(
        ClientId::new(format!("{}@{tenant}", config.client_id)),
        Some(ClientSecret::new(config.client_secret.clone())),
        AuthUrl::new(token_url.clone())
            .map_err(|e| ConnectError::Configuration(format!("invalid token url: {e}")))?,
        Some(
            TokenUrl::new(token_url)
                .map_err(|e| ConnectError::Configuration(format!("invalid token url: {e}")))?,
        ),
    )
    .set_auth_type(AuthType::RequestBody);

    let resource = format!("{SHAREPOINT_PRINCIPAL}/{site_host}@{tenant}");
    let token = client
        .exchange_client_credentials()
        .add_extra_param("resource", resource)
        .request(http_client)
        .map_err(|e| ConnectError::Token(format!("{e:?}")))?;

    Ok(token.access_token().secret().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acs_response_shape() {
        let json = r#"{"token_type":"Bearer","expires_in":"86399","not_before":"1","resource":"x","access_token":"abc"}"#;
        let reply: AcsTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply.access_token().secret(), "abc");
        assert_eq!(reply.token_type(), &BasicTokenType::Bearer);
        assert_eq!(reply.expires_in(), Some(Duration::from_secs(86399)));
    }

    #[test]
    fn test_acs_response_expiry_missing_or_null() {
        let null = r#"{"token_type":"bearer","expires_in":null,"access_token":"abc"}"#;
        let reply: AcsTokenResponse = serde_json::from_str(null).unwrap();
        assert_eq!(reply.expires_in(), None);

        let absent = r#"{"token_type":"Bearer","access_token":"abc"}"#;
        let reply: AcsTokenResponse = serde_json::from_str(absent).unwrap();
        assert_eq!(reply.expires_in(), None);

        let number = r#"{"token_type":"Bearer","expires_in":3599,"access_token":"abc"}"#;
        let reply: AcsTokenResponse = serde_json::from_str(number).unwrap();
        assert_eq!(reply.expires_in(), Some(Duration::from_secs(3599)));
    }

    #[test]
    fn test_default_token_url() {
        assert_eq!(
            default_token_url("t-1"),
            "https://accounts.accesscontrol.windows.net/t-1/tokens/OAuth/2"
        );
    }
}
