mod common;

use std::{net::SocketAddr, time::Duration};

use common::{StubResponse, credentials, http, spawn_stub};
use shellify::{
    Error,
    api::SUCCESS_BODY,
    config::Endpoints,
    server::CallbackListener,
    types::OAuthTokens,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

async fn bind_listener(base_url: &str) -> CallbackListener {
    CallbackListener::bind(
        "127.0.0.1:0",
        http(),
        Endpoints::with_base(base_url),
        credentials(),
    )
    .await
    .unwrap()
}

/// Plays the browser: sends one request and reads until the server closes.
async fn send_callback(addr: SocketAddr, request_line: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{request_line}\r\nHost: localhost:8888\r\nAccept: text/html\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn body_of(response: &str) -> &str {
    response.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("")
}

#[tokio::test]
async fn test_exchanges_code_for_tokens() {
    let stub = spawn_stub(|_| {
        StubResponse::json(
            200,
            r#"{"access_token":"T1","token_type":"Bearer","scope":"user-read-playback-state","expires_in":3600,"refresh_token":"R1"}"#,
        )
    })
    .await;

    let listener = bind_listener(&stub.base_url()).await;
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback?code=ABC123 HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(
        tokens,
        Some(OAuthTokens {
            access_token: "T1".to_string(),
            refresh_token: "R1".to_string(),
        })
    );

    // exactly one token exchange, carrying the code
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let exchange = &requests[0];
    assert_eq!(exchange.method, "POST");
    assert_eq!(exchange.path, "/api/token");
    assert_eq!(exchange.header("authorization"), Some("Basic YWJjOnh5eg=="));
    assert!(exchange.body.contains("code=ABC123"));
    assert!(exchange.body.contains("grant_type=authorization_code"));
    assert!(exchange.body.contains("client_id=abc"));
    assert!(exchange.body.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"));
    assert!(exchange.body.contains("scope=user-read-playback-state"));

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body_of(&response), SUCCESS_BODY);

    // listening socket is gone
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_rejected_exchange_shows_provider_body() {
    let stub = spawn_stub(|_| StubResponse::json(400, "invalid_grant")).await;

    let listener = bind_listener(&stub.base_url()).await;
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback?code=EXPIRED HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(tokens, None);
    assert_eq!(stub.requests().len(), 1);
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body_of(&response), "Spotify didn't like that\ninvalid_grant");
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_content_length_matches_body() {
    let stub = spawn_stub(|_| StubResponse::json(400, "invalid_grant")).await;

    let listener = bind_listener(&stub.base_url()).await;
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback?code=X HTTP/1.1").await;
    handle.await.unwrap().unwrap();

    let length: usize = response
        .lines()
        .find_map(|l| l.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(length, body_of(&response).len());
    assert!(response.contains("\r\ndate: "));
    assert!(response.contains("\r\nserver: shellify\r\n"));
}

#[tokio::test]
async fn test_denied_authorization_skips_exchange() {
    let stub = spawn_stub(|_| StubResponse::json(200, "{}")).await;

    let listener = bind_listener(&stub.base_url()).await;
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback?error=access_denied HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(tokens, None);
    assert!(stub.requests().is_empty());
    assert!(body_of(&response).contains("access_denied"));
}

#[tokio::test]
async fn test_missing_code_skips_exchange() {
    let stub = spawn_stub(|_| StubResponse::json(200, "{}")).await;

    let listener = bind_listener(&stub.base_url()).await;
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(tokens, None);
    assert!(stub.requests().is_empty());
    assert_eq!(body_of(&response), shellify::api::MISSING_CODE_BODY);
}

#[tokio::test]
async fn test_state_must_match_when_expected() {
    let stub = spawn_stub(|_| {
        StubResponse::json(200, r#"{"access_token":"T1","refresh_token":"R1"}"#)
    })
    .await;

    let listener = bind_listener(&stub.base_url())
        .await
        .expect_state("expected");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    let response = send_callback(addr, "GET /callback?code=ABC&state=forged HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(tokens, None);
    assert!(stub.requests().is_empty());
    assert_eq!(body_of(&response), shellify::api::STATE_MISMATCH_BODY);
}

#[tokio::test]
async fn test_matching_state_is_accepted() {
    let stub = spawn_stub(|_| {
        StubResponse::json(200, r#"{"access_token":"T1","refresh_token":"R1"}"#)
    })
    .await;

    let listener = bind_listener(&stub.base_url())
        .await
        .expect_state("expected");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    send_callback(addr, "GET /callback?state=expected&code=ABC HTTP/1.1").await;
    let tokens = handle.await.unwrap().unwrap();

    assert_eq!(tokens.map(|t| t.access_token), Some("T1".to_string()));
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn test_times_out_without_callback() {
    let listener = bind_listener("http://127.0.0.1:9")
        .await
        .with_timeout(Duration::from_millis(50));
    let addr = listener.local_addr().unwrap();

    let result = listener.run().await;

    assert!(matches!(result, Err(Error::AuthorizationTimeout(_))));
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_silent_connection_times_out() {
    let stub = spawn_stub(|_| StubResponse::json(200, "{}")).await;

    let listener = bind_listener(&stub.base_url())
        .await
        .with_timeout(Duration::from_millis(100));
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(listener.run());

    // connect like a speculative browser socket, then never send a request
    let mut idle = TcpStream::connect(addr).await.unwrap();
    let result = handle.await.unwrap();

    assert!(matches!(result, Err(Error::AuthorizationTimeout(_))));
    assert!(stub.requests().is_empty());

    // the server closed its end without answering
    let mut rest = Vec::new();
    idle.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
    assert!(TcpStream::connect(addr).await.is_err());
}
