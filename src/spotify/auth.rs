use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode, Url, header::AUTHORIZATION};
use tracing::debug;

use crate::{
    Error, Res,
    config::{self, Endpoints},
    types::{AppCredentials, OAuthTokens, RefreshedToken},
};

/// Result of posting an authorization code to the token endpoint.
#[derive(Debug)]
pub enum ExchangeOutcome {
    Tokens(OAuthTokens),
    /// The provider refused the exchange; `body` is its answer, untouched.
    Rejected { status: StatusCode, body: String },
}

/// Builds the URL the user opens to grant shellify access.
///
/// `state` is echoed back by Spotify on the callback and checked by the
/// listener.
pub fn authorize_url(
    endpoints: &Endpoints,
    credentials: &AppCredentials,
    state: &str,
) -> Res<String> {
    let scope = config::spotify_scope();
    let url = Url::parse_with_params(
        &endpoints.auth_url,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", endpoints.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::InvalidUrl(format!("{}: {}", endpoints.auth_url, e)))?;

    Ok(url.into())
}

/// `Basic base64(client_id:client_secret)`
pub fn basic_auth(credentials: &AppCredentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

/// Exchanges an authorization code for an access and refresh token.
///
/// A refusal by the provider is not an `Err`: it comes back as
/// [`ExchangeOutcome::Rejected`] so the caller can show the provider's body
/// to the user. `Err` is reserved for transport and decoding failures.
pub async fn exchange_code(
    http: &Client,
    endpoints: &Endpoints,
    credentials: &AppCredentials,
    code: &str,
) -> Res<ExchangeOutcome> {
    let scope = config::spotify_scope();
    let response = http
        .post(&endpoints.token_url)
        .header(AUTHORIZATION, basic_auth(credentials))
        .form(&[
            ("client_id", credentials.client_id.as_str()),
            ("scope", scope.as_str()),
            ("redirect_uri", endpoints.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    debug!(%status, "token endpoint answered authorization code exchange");

    if !status.is_success() {
        return Ok(ExchangeOutcome::Rejected { status, body });
    }

    let tokens: OAuthTokens = serde_json::from_str(&body)?;
    Ok(ExchangeOutcome::Tokens(tokens))
}

/// Trades a refresh token for a new access token.
pub async fn refresh_access_token(
    http: &Client,
    token_url: &str,
    credentials: &AppCredentials,
    refresh_token: &str,
) -> Res<RefreshedToken> {
    let response = http
        .post(token_url)
        .header(AUTHORIZATION, basic_auth(credentials))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::TokenRefresh { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AppCredentials {
        AppCredentials {
            client_id: "abc".to_string(),
            client_secret: "xyz".to_string(),
        }
    }

    #[test]
    fn basic_auth_is_base64_of_id_and_secret() {
        // base64("abc:xyz")
        assert_eq!(basic_auth(&credentials()), "Basic YWJjOnh5eg==");
    }

    #[test]
    fn authorize_url_carries_all_parameters() {
        let url = authorize_url(&Endpoints::default(), &credentials(), "s7a7e").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(pairs.contains(&("client_id".into(), "abc".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:8888/callback".into()
        )));
        assert!(pairs.contains(&("scope".into(), config::spotify_scope())));
        assert!(pairs.contains(&("state".into(), "s7a7e".into())));
    }
}
