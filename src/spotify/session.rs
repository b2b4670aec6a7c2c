use reqwest::{Client, Method, Response, StatusCode, header::CONTENT_LENGTH};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    Error, Res,
    config::Endpoints,
    types::{AppCredentials, UserSession},
};

use super::auth;

/// Receives a new access token after the session refreshed it.
///
/// Implementations must have persisted the token when the returned future
/// resolves; the session retries the failed request right after.
#[allow(async_fn_in_trait)]
pub trait TokenRefreshHandler {
    async fn on_token_refreshed(&mut self, access_token: &str) -> Res<()>;
}

/// An authenticated connection to the Spotify Web API.
pub struct Session<H> {
    http: Client,
    endpoints: Endpoints,
    credentials: AppCredentials,
    access_token: String,
    refresh_token: String,
    handler: H,
}

impl<H: TokenRefreshHandler> Session<H> {
    pub fn new(
        http: Client,
        endpoints: Endpoints,
        credentials: AppCredentials,
        user: &UserSession,
        handler: H,
    ) -> Self {
        Self {
            http,
            endpoints,
            credentials,
            access_token: user.access_token.clone(),
            refresh_token: user.refresh_token.clone(),
            handler,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Exchanges the refresh token for a new access token and reports it to
    /// the handler.
    pub async fn refresh(&mut self) -> Res<()> {
        let refreshed = auth::refresh_access_token(
            &self.http,
            &self.endpoints.token_url,
            &self.credentials,
            &self.refresh_token,
        )
        .await?;

        debug!(expires_in = ?refreshed.expires_in, "access token refreshed");
        self.access_token = refreshed.access_token;
        self.handler.on_token_refreshed(&self.access_token).await
    }

    pub async fn get<T: DeserializeOwned>(&mut self, path: &str, query: &[(&str, String)]) -> Res<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`Session::get`], but `204 No Content` (or an empty body) yields
    /// `None`. The player endpoints answer this way when nothing is playing.
    pub async fn get_optional<T: DeserializeOwned>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<Option<T>> {
        let response = self.send(Method::GET, path, query, None).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    pub async fn put(&mut self, path: &str, query: &[(&str, String)], body: Option<&Value>) -> Res<()> {
        self.send(Method::PUT, path, query, body).await.map(|_| ())
    }

    pub async fn post(&mut self, path: &str, query: &[(&str, String)], body: Option<&Value>) -> Res<()> {
        self.send(Method::POST, path, query, body).await.map(|_| ())
    }

    pub async fn delete(&mut self, path: &str, query: &[(&str, String)], body: Option<&Value>) -> Res<()> {
        self.send(Method::DELETE, path, query, body).await.map(|_| ())
    }

    /// Sends a request, refreshing the token and retrying once on `401`.
    async fn send(
        &mut self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Res<Response> {
        let url = self.url(path);

        let response = self.dispatch(&method, &url, query, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check(response).await;
        }

        debug!(%url, "access token rejected, refreshing");
        self.refresh().await?;

        let response = self.dispatch(&method, &url, query, body).await?;
        check(response).await
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Res<Response> {
        trace!(%method, %url, "spotify request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&self.access_token);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            Some(json) => request.json(json),
            // Spotify answers 411 to body-less PUT/POST without a length
            None if *method != Method::GET => request.header(CONTENT_LENGTH, 0),
            None => request,
        };

        Ok(request.send().await?)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.endpoints.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

async fn check(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::from_status(status, &body))
}
