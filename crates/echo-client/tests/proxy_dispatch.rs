//! Requests sent through a live (in-process) proxy endpoint.

mod common;

use common::{closed_port_url, FakeServer, Reply};
use echo_client::translator::StatusClass;
use echo_client::{BaseUrl, EchoError, ProxyClient, ProxyRequest};
use serde_json::json;

#[tokio::test]
async fn test_get_keeps_path_and_query_and_drops_target_host() {
    let server = FakeServer::start(|_| {
        Reply::json(200, json!({"id": 1})).with_header("x-upstream", "jsonplaceholder")
    })
    .await;
    let echo = server.client();

    let response = echo
        .proxy()
        .send(&ProxyRequest::new(
            "GET",
            "https://jsonplaceholder.typicode.com/posts/1?_embed=comments",
        ))
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].uri, "/posts/1?_embed=comments");
    assert_eq!(requests[0].header("host"), Some(server.addr.to_string().as_str()));
    assert_eq!(requests[0].header("content-type"), None);

    assert_eq!(response.status_code, 200);
    assert_eq!(response.status_text, "OK");
    assert!(response.is_success());
    assert_eq!(response.header("X-Upstream"), Some("jsonplaceholder"));
    assert_eq!(response.body, r#"{"id":1}"#);
}

#[tokio::test]
async fn test_post_body_gets_default_content_type() {
    let server = FakeServer::start(|_| Reply::json(201, json!({"id": 101}))).await;
    let echo = server.client();

    let response = echo
        .proxy()
        .send(
            &ProxyRequest::new("post", "https://jsonplaceholder.typicode.com/posts")
                .with_body(r#"{"title":"foo"}"#),
        )
        .await
        .unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.uri, "/posts");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body, r#"{"title":"foo"}"#);
    assert_eq!(response.status_code, 201);
}

#[tokio::test]
async fn test_caller_content_type_replaces_default() {
    let server = FakeServer::start(|_| Reply::empty(204)).await;
    let echo = server.client();

    echo.proxy()
        .send(
            &ProxyRequest::new("PUT", "https://api.example.com/notes/7")
                .with_header("content-type", "text/plain")
                .with_header("X-Trace", "abc")
                .with_body("hello"),
        )
        .await
        .unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.header_count("content-type"), 1);
    assert_eq!(request.header("content-type"), Some("text/plain"));
    assert_eq!(request.header("x-trace"), Some("abc"));
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let server = FakeServer::start(|_| Reply::text(404, "No recorded response")).await;
    let echo = server.client();

    let response = echo
        .proxy()
        .send(&ProxyRequest::new("DELETE", "https://api.example.com/posts/1"))
        .await
        .unwrap();

    assert_eq!(server.requests()[0].body, "");
    assert_eq!(response.status_code, 404);
    assert_eq!(response.status_text, "Not Found");
    assert_eq!(response.status_class(), StatusClass::ClientError);
    assert_eq!(response.body, "No recorded response");
}

#[tokio::test]
async fn test_schemeless_target_uses_fallback() {
    let server = FakeServer::start(|_| Reply::empty(200)).await;
    let echo = server.client();

    echo.proxy()
        .send(&ProxyRequest::new("GET", "jsonplaceholder.typicode.com/users?id=3"))
        .await
        .unwrap();
    echo.proxy()
        .send(&ProxyRequest::new("GET", "jsonplaceholder.typicode.com"))
        .await
        .unwrap();

    let uris: Vec<String> = server.requests().into_iter().map(|r| r.uri).collect();
    assert_eq!(uris, vec!["/users?id=3", "/"]);
}

#[tokio::test]
async fn test_unencoded_target_forwarded_percent_encoded() {
    let server = FakeServer::start(|_| Reply::empty(200)).await;
    let echo = server.client();

    echo.proxy()
        .send(&ProxyRequest::new(
            "GET",
            "https://api.example.com/search?q=hello world",
        ))
        .await
        .unwrap();

    assert_eq!(server.requests()[0].uri, "/search?q=hello%20world");
}

#[tokio::test]
async fn test_redirect_returned_not_followed() {
    let server =
        FakeServer::start(|_| Reply::empty(302).with_header("location", "/elsewhere")).await;
    let echo = server.client();

    let response = echo
        .proxy()
        .send(&ProxyRequest::new("GET", "https://api.example.com/old"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 302);
    assert_eq!(response.header("location"), Some("/elsewhere"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unreachable_proxy_is_transport_failure() {
    let base = BaseUrl::parse(&closed_port_url().await).unwrap();
    let proxy = ProxyClient::new(reqwest::Client::new(), base);

    let err = proxy
        .send(&ProxyRequest::new("GET", "https://api.example.com/users"))
        .await
        .unwrap_err();
    assert!(matches!(err, EchoError::TransportFailure(_)));
    assert!(!err.is_local());
}
