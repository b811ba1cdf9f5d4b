//! Integration tests for the WebDriver client using mockito for HTTP mocking.

mod mocks;

use mockito::{Matcher, Server, ServerGuard};
use mocks::RecordingPacer;
use serde_json::json;
use std::time::Duration;
use wpbot::strategy::{ChatSession, OneShotLauncher};
use wpbot::webdriver::{BrowserOptions, ENTER_KEY};
use wpbot::{CanonicalNumber, WebDriverChatSession, WebDriverClient, WebDriverError, WebDriverLauncher};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

fn session_mock(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/session")
        .match_body(Matcher::PartialJson(json!({
            "capabilities": { "alwaysMatch": { "browserName": "chrome" } }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value": {"sessionId": "abc123", "capabilities": {}}}"#)
        .create()
}

fn ok_mock(server: &mut ServerGuard, method: &str, path: &str) -> mockito::Mock {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value": null}"#)
        .create()
}

fn element_mock(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/session/abc123/element")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "value": { ELEMENT_KEY: "el-1" } }).to_string())
        .create()
}

fn no_such_element_mock(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/session/abc123/element")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"value": {"error": "no such element", "message": "Unable to locate element", "stacktrace": ""}}"#,
        )
        .expect_at_least(2)
        .create()
}

#[test]
fn test_new_session_sends_chrome_args() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/session")
        .match_body(Matcher::PartialJson(json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": ["--disable-notifications", "--user-data-dir=/tmp/wpbot"]
                    }
                }
            }
        })))
        .with_status(200)
        .with_body(r#"{"value": {"sessionId": "abc123", "capabilities": {}}}"#)
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let options = BrowserOptions::new(Some("/tmp/wpbot".into()));
    let session = client.new_session(&options).unwrap();

    mock.assert();
    assert_eq!(session.as_str(), "abc123");
    assert_eq!(client.metrics().webdriver_requests_total(), 1);
}

#[test]
fn test_session_not_created() {
    let mut server = Server::new();

    server
        .mock("POST", "/session")
        .with_status(500)
        .with_body(
            r#"{"value": {"error": "session not created", "message": "Chrome failed to start"}}"#,
        )
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let err = client.new_session(&BrowserOptions::default()).unwrap_err();

    assert!(matches!(err, WebDriverError::SessionNotCreated(ref m) if m == "Chrome failed to start"));
    assert!(err.is_infrastructure());
    assert_eq!(client.metrics().webdriver_errors_total(), 1);
}

#[test]
fn test_unreachable_driver() {
    let client = WebDriverClient::with_base_url("http://127.0.0.1:1".to_string());
    let err = client.new_session(&BrowserOptions::default()).unwrap_err();

    assert!(matches!(err, WebDriverError::Unreachable(_)));
    assert!(err.is_infrastructure());
}

#[test]
fn test_navigate() {
    let mut server = Server::new();
    session_mock(&mut server);

    let mock = server
        .mock("POST", "/session/abc123/url")
        .match_body(Matcher::Json(json!({ "url": "https://web.whatsapp.com" })))
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let session = client.new_session(&BrowserOptions::default()).unwrap();
    client.navigate(&session, "https://web.whatsapp.com").unwrap();

    mock.assert();
}

#[test]
fn test_find_element_and_send_keys() {
    let mut server = Server::new();
    session_mock(&mut server);

    let find = server
        .mock("POST", "/session/abc123/element")
        .match_body(Matcher::Json(json!({
            "using": "css selector",
            "value": "div[role='textbox']"
        })))
        .with_status(200)
        .with_body(json!({ "value": { ELEMENT_KEY: "el-1" } }).to_string())
        .create();

    let keys = server
        .mock("POST", "/session/abc123/element/el-1/value")
        .match_body(Matcher::Json(json!({ "text": ENTER_KEY })))
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let session = client.new_session(&BrowserOptions::default()).unwrap();
    let element = client.find_element(&session, "div[role='textbox']").unwrap();
    client.send_keys(&session, &element, ENTER_KEY).unwrap();

    find.assert();
    keys.assert();
    assert_eq!(element.as_str(), "el-1");
}

#[test]
fn test_wait_for_element_times_out() {
    let mut server = Server::new();
    session_mock(&mut server);
    let mock = no_such_element_mock(&mut server);

    let client = WebDriverClient::with_base_url(server.url());
    let session = client.new_session(&BrowserOptions::default()).unwrap();
    let err = client
        .wait_for_element(&session, "div.missing", Duration::from_millis(300))
        .unwrap_err();

    mock.assert();
    assert!(matches!(err, WebDriverError::WaitTimeout { ref selector, .. } if selector == "div.missing"));
    assert!(!err.is_infrastructure());
}

#[test]
fn test_invalid_session_is_infrastructure() {
    let mut server = Server::new();
    session_mock(&mut server);

    server
        .mock("POST", "/session/abc123/url")
        .with_status(404)
        .with_body(r#"{"value": {"error": "invalid session id", "message": "session deleted"}}"#)
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let session = client.new_session(&BrowserOptions::default()).unwrap();
    let err = client.navigate(&session, "https://web.whatsapp.com").unwrap_err();

    assert!(matches!(err, WebDriverError::InvalidSession(_)));
    assert!(err.is_infrastructure());
}

#[test]
fn test_unknown_protocol_error() {
    let mut server = Server::new();
    session_mock(&mut server);

    server
        .mock("POST", "/session/abc123/window/maximize")
        .with_status(500)
        .with_body(r#"{"value": {"error": "unknown error", "message": "cannot maximize"}}"#)
        .create();

    let client = WebDriverClient::with_base_url(server.url());
    let session = client.new_session(&BrowserOptions::default()).unwrap();
    let err = client.maximize_window(&session).unwrap_err();

    match err {
        WebDriverError::Protocol {
            status,
            error,
            message,
        } => {
            assert_eq!(status, 500);
            assert_eq!(error, "unknown error");
            assert_eq!(message, "cannot maximize");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_chat_session_login_and_send() {
    let mut server = Server::new();
    session_mock(&mut server);
    ok_mock(&mut server, "POST", "/session/abc123/window/maximize");
    let navigate = server
        .mock("POST", "/session/abc123/url")
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .expect(2)
        .create();
    element_mock(&mut server);
    let enter = ok_mock(&mut server, "POST", "/session/abc123/element/el-1/value");
    let close = ok_mock(&mut server, "DELETE", "/session/abc123");

    let client = WebDriverClient::with_base_url(server.url());
    let mut session = WebDriverChatSession::new(
        client,
        BrowserOptions::default(),
        server.url(),
        5,
    );

    session.ensure_ready(30).unwrap();
    let recipient = CanonicalNumber::new("+905551234567").unwrap();
    session.send_one(&recipient, "Merhaba").unwrap();
    drop(session);

    navigate.assert();
    enter.assert();
    close.assert();
}

#[test]
fn test_chat_session_send_before_login_is_fatal() {
    let client = WebDriverClient::with_base_url("http://127.0.0.1:1".to_string());
    let mut session =
        WebDriverChatSession::new(client, BrowserOptions::default(), "https://web.whatsapp.com", 5);

    let recipient = CanonicalNumber::new("+905551234567").unwrap();
    let err = session.send_one(&recipient, "hi").unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_launcher_opens_deep_link_and_closes() {
    let mut server = Server::new();
    session_mock(&mut server);
    let navigate = server
        .mock("POST", "/session/abc123/url")
        .match_body(Matcher::Json(json!({
            "url": format!("{}/send?phone=905551234567&text=Hello%20there", server.url())
        })))
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .create();
    element_mock(&mut server);
    ok_mock(&mut server, "POST", "/session/abc123/element/el-1/value");
    let close = ok_mock(&mut server, "DELETE", "/session/abc123");

    let pacer = RecordingPacer::new();
    let client = WebDriverClient::with_base_url(server.url());
    let mut launcher = WebDriverLauncher::new(client, BrowserOptions::default(), server.url())
        .with_pacer(pacer.clone());

    let recipient = CanonicalNumber::new("+905551234567").unwrap();
    launcher
        .send_one(&recipient, "Hello there", 10, true, 3)
        .unwrap();

    navigate.assert();
    close.assert();
    assert_eq!(pacer.pauses(), vec![Duration::from_secs(3)]);
}

#[test]
fn test_launcher_missing_input_is_delivery_failure() {
    let mut server = Server::new();
    session_mock(&mut server);
    ok_mock(&mut server, "POST", "/session/abc123/url");
    no_such_element_mock(&mut server);
    let close = ok_mock(&mut server, "DELETE", "/session/abc123");

    let client = WebDriverClient::with_base_url(server.url());
    let mut launcher = WebDriverLauncher::new(client, BrowserOptions::default(), server.url())
        .with_pacer(RecordingPacer::new());

    let recipient = CanonicalNumber::new("+905551234567").unwrap();
    let err = launcher.send_one(&recipient, "hi", 0, false, 3).unwrap_err();

    assert!(!err.is_fatal());
    close.assert();
}

#[test]
fn test_launcher_keep_tab_open_closes_previous_session() {
    let mut server = Server::new();

    let create = server
        .mock("POST", "/session")
        .match_body(Matcher::PartialJson(json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": ["--disable-notifications", "--user-data-dir=/tmp/profile"]
                    }
                }
            }
        })))
        .with_status(200)
        .with_body(r#"{"value": {"sessionId": "abc123", "capabilities": {}}}"#)
        .expect(2)
        .create();
    ok_mock(&mut server, "POST", "/session/abc123/url");
    element_mock(&mut server);
    ok_mock(&mut server, "POST", "/session/abc123/element/el-1/value");
    let close = server
        .mock("DELETE", "/session/abc123")
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .expect(1)
        .create();

    let pacer = RecordingPacer::new();
    let client = WebDriverClient::with_base_url(server.url());
    let options = BrowserOptions::new(Some("/tmp/profile".into()));
    let mut launcher = WebDriverLauncher::new(client, options, server.url()).with_pacer(pacer.clone());

    let first = CanonicalNumber::new("+905551234567").unwrap();
    let second = CanonicalNumber::new("+4915112345678").unwrap();
    launcher.send_one(&first, "hi", 10, false, 3).unwrap();
    assert!(launcher.has_open_session());
    launcher.send_one(&second, "hi", 10, false, 3).unwrap();

    // The first tab was closed before the second session started.
    create.assert();
    close.assert();
    assert!(launcher.has_open_session());
    assert!(pacer.pauses().is_empty());

    // Dropping the launcher closes the last kept-open tab.
    close.remove();
    let close_on_drop = server
        .mock("DELETE", "/session/abc123")
        .with_status(200)
        .with_body(r#"{"value": null}"#)
        .expect(1)
        .create();
    drop(launcher);
    close_on_drop.assert();
}
