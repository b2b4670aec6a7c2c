//! One-shot listener for the OAuth redirect.
//!
//! The listener moves through
//! `Listening -> RequestReceived -> TokenExchangeOk | TokenExchangeFailed -> Closed`.
//! It accepts exactly one connection, answers it, and closes both the
//! connection and the listening socket on every path out of [`CallbackListener::run`].

use std::{net::SocketAddr, time::Duration};

use reqwest::Client;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, warn};

use crate::{
    Error, Res,
    api::{self, CallbackRequest},
    config::{self, Endpoints},
    spotify::auth::{self, ExchangeOutcome},
    types::{AppCredentials, OAuthTokens},
};

/// Header lines read after the request line before answering anyway.
const MAX_HEADER_LINES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    RequestReceived,
    TokenExchangeOk,
    TokenExchangeFailed,
    Closed,
}

pub struct CallbackListener {
    listener: TcpListener,
    exchange: Exchange,
    timeout: Duration,
}

/// Everything needed to turn a callback into tokens.
struct Exchange {
    http: Client,
    endpoints: Endpoints,
    credentials: AppCredentials,
    expected_state: Option<String>,
}

struct Outcome {
    state: ListenerState,
    tokens: Option<OAuthTokens>,
    body: String,
}

impl Outcome {
    fn failed(body: impl Into<String>) -> Self {
        Self {
            state: ListenerState::TokenExchangeFailed,
            tokens: None,
            body: body.into(),
        }
    }
}

impl CallbackListener {
    /// Binds the listening socket. In production `addr` is
    /// [`Endpoints::callback_address`].
    pub async fn bind(
        addr: &str,
        http: Client,
        endpoints: Endpoints,
        credentials: AppCredentials,
    ) -> Res<Self> {
        let listener = TcpListener::bind(addr).await?;
        debug!(addr = %listener.local_addr()?, state = ?ListenerState::Listening, "callback listener bound");

        Ok(Self {
            listener,
            exchange: Exchange {
                http,
                endpoints,
                credentials,
                expected_state: None,
            },
            timeout: Duration::from_secs(config::DEFAULT_CALLBACK_TIMEOUT_SECS),
        })
    }

    /// Requires the callback to echo `state` back.
    pub fn expect_state(mut self, state: impl Into<String>) -> Self {
        self.exchange.expected_state = Some(state.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> Res<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Waits for the browser redirect and exchanges its code for tokens.
    ///
    /// Returns `Ok(None)` when the callback arrived but produced no tokens
    /// (denied, missing code, state mismatch, or rejected by Spotify); the
    /// browser has been told why. `Err` means no usable callback arrived at
    /// all: the timeout elapsed or the socket failed.
    pub async fn run(self) -> Res<Option<OAuthTokens>> {
        let Self {
            listener,
            exchange,
            timeout,
        } = self;

        let accepted = tokio::time::timeout(timeout, listener.accept()).await;
        drop(listener);

        let (stream, peer) = match accepted {
            Ok(result) => result?,
            Err(_) => {
                debug!(state = ?ListenerState::Closed, "no callback before timeout");
                return Err(Error::AuthorizationTimeout(timeout.as_secs()));
            }
        };
        debug!(%peer, state = ?ListenerState::RequestReceived, "callback connection accepted");

        let result = exchange.serve(stream, timeout).await;
        debug!(state = ?ListenerState::Closed, "callback listener closed");
        result
    }
}

impl Exchange {
    async fn serve(&self, mut stream: TcpStream, timeout: Duration) -> Res<Option<OAuthTokens>> {
        let result = self.respond(&mut stream, timeout).await;
        let _ = stream.shutdown().await;
        result
    }

    async fn respond(&self, stream: &mut TcpStream, timeout: Duration) -> Res<Option<OAuthTokens>> {
        let (reader, mut writer) = stream.split();
        let mut reader = BufReader::new(reader);

        // a connection that never sends a request must not hold the flow open
        let request_line = match tokio::time::timeout(timeout, read_head(&mut reader)).await {
            Ok(line) => line?,
            Err(_) => {
                debug!("connection sent no request before timeout");
                return Err(Error::AuthorizationTimeout(timeout.as_secs()));
            }
        };

        let outcome = match CallbackRequest::parse(&request_line) {
            Ok(request) => self.resolve(&request).await,
            Err(e) => {
                warn!("{}", e);
                Outcome::failed(api::MALFORMED_BODY)
            }
        };
        debug!(state = ?outcome.state, "callback handled");

        writer
            .write_all(api::render_response(&outcome.body).as_bytes())
            .await?;
        writer.flush().await?;

        Ok(outcome.tokens)
    }

    async fn resolve(&self, request: &CallbackRequest) -> Outcome {
        if let Some(error) = request.param("error") {
            return Outcome::failed(format!("{}{}", api::DENIED_PREFIX, error));
        }

        if let Some(expected) = &self.expected_state {
            if request.param("state") != Some(expected.as_str()) {
                return Outcome::failed(api::STATE_MISMATCH_BODY);
            }
        }

        let Some(code) = request.code() else {
            return Outcome::failed(api::MISSING_CODE_BODY);
        };

        match auth::exchange_code(&self.http, &self.endpoints, &self.credentials, code).await {
            Ok(ExchangeOutcome::Tokens(tokens)) => Outcome {
                state: ListenerState::TokenExchangeOk,
                tokens: Some(tokens),
                body: api::SUCCESS_BODY.to_string(),
            },
            Ok(ExchangeOutcome::Rejected { status, body }) => {
                debug!(%status, "token endpoint rejected the authorization code");
                Outcome::failed(format!("{}{}", api::FAILURE_PREFIX, body))
            }
            Err(e) => Outcome::failed(format!("{}{}", api::FAILURE_PREFIX, e)),
        }
    }
}

/// Reads the request line and skips the header lines after it.
async fn read_head<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Res<String> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    drain_headers(reader).await?;
    Ok(request_line)
}

async fn drain_headers<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Res<()> {
    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 || line.trim().is_empty() {
            break;
        }
    }
    Ok(())
}
