//! Integration tests for the HTTP clients against wiremock servers.

#![allow(clippy::unwrap_used, clippy::panic)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use colloquium::clients::{
    CitationClient, CitationSource, ClientError, DirectoryClient, HttpMailer, MailTransport,
    NameDirectory, RsvpSource, SheetsClient,
};
use colloquium_core::{CitationTarget, Email, Recipients};
use serde_json::json;
use wiremock::matchers::{header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// SPREADSHEET
// =============================================================================

#[tokio::test]
async fn sheets_rows_are_fetched_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Responses"))
        .and(header_regex("Authorization", "Bearer sheets-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Responses!A1:C3",
            "values": [
                ["Email Address", "You are RSVP'ing for our meeting on:", "Guests"],
                ["ada@example.edu", "5/21/2024", 2]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetsClient::new(
        reqwest::Client::new(),
        server.uri(),
        "sheet-123",
        "Responses",
        Some("sheets-token".to_string()),
    );
    let rows = client.fetch_rows().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], ["ada@example.edu", "5/21/2024", "2"]);
}

#[tokio::test]
async fn sheets_unauthorized_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = SheetsClient::new(reqwest::Client::new(), server.uri(), "id", "Responses", None);
    assert!(matches!(
        client.fetch_rows().await,
        Err(ClientError::Unauthorized)
    ));
}

// =============================================================================
// DIRECTORY
// =============================================================================

#[tokio::test]
async fn directory_returns_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people"))
        .and(query_param("email", "ada@example.edu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": "Ada Lovelace"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(reqwest::Client::new(), server.uri(), None, 0);
    let name = client.lookup_name("ada@example.edu").await.unwrap();
    assert_eq!(name.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn directory_not_found_and_missing_name_are_misses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("email", "ghost@example.edu"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("email", "blank@example.edu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "  "})))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(reqwest::Client::new(), server.uri(), None, 0);
    assert_eq!(client.lookup_name("ghost@example.edu").await.unwrap(), None);
    assert_eq!(client.lookup_name("blank@example.edu").await.unwrap(), None);
}

#[tokio::test]
async fn directory_rate_limit_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(reqwest::Client::new(), server.uri(), None, 0);
    assert!(matches!(
        client.lookup_name("ada@example.edu").await,
        Err(ClientError::RateLimited)
    ));
}

#[tokio::test]
async fn directory_lookups_are_paced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "X"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(reqwest::Client::new(), server.uri(), None, 200);
    let started = std::time::Instant::now();
    client.lookup_name("a@example.edu").await.unwrap();
    client.lookup_name("b@example.edu").await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(150));
}

#[tokio::test]
async fn unreachable_directory_is_connection_failure() {
    let client = DirectoryClient::new(reqwest::Client::new(), "http://127.0.0.1:1", None, 0);
    assert!(matches!(
        client.lookup_name("ada@example.edu").await,
        Err(ClientError::ConnectionFailed(_))
    ));
}

// =============================================================================
// CITATIONS
// =============================================================================

#[tokio::test]
async fn arxiv_lookup_parses_atom() {
    let server = MockServer::start().await;
    let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <published>2023-10-19T00:00:00Z</published>
    <title>Library learning &amp; abstraction</title>
    <author><name>Gabriel Grand</name></author>
  </entry>
</feed>"#;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("id_list", "2310.13018"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed))
        .expect(1)
        .mount(&server)
        .await;

    let client = CitationClient::new(
        reqwest::Client::new(),
        format!("{}/api/query", server.uri()),
        server.uri(),
    );
    let citation = client
        .lookup(&CitationTarget::Arxiv("2310.13018".to_string()))
        .await
        .unwrap();

    assert_eq!(
        citation.format_line(),
        "Grand, G. (2023). Library learning & abstraction. arXiv. \
         https://doi.org/10.48550/arXiv.2310.13018"
    );
}

#[tokio::test]
async fn doi_lookup_negotiates_csl_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/10.1126/science.1192788"))
        .and(header("Accept", "application/vnd.citationstyles.csl+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "How to grow a mind",
            "author": [
                {"given": "Joshua B.", "family": "Tenenbaum"},
                {"given": "Charles", "family": "Kemp"}
            ],
            "issued": {"date-parts": [[2011, 3, 11]]},
            "container-title": "Science",
            "volume": "331",
            "issue": "6022",
            "page": "1279-1285"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CitationClient::new(reqwest::Client::new(), server.uri(), server.uri());
    let citation = client
        .lookup(&CitationTarget::Doi("10.1126/science.1192788".to_string()))
        .await
        .unwrap();

    assert_eq!(
        citation.format_line(),
        "Tenenbaum, J. & Kemp, C. (2011). How to grow a mind. Science, 331(6022), \
         1279\u{2013}1285. https://doi.org/10.1126/science.1192788"
    );
}

#[tokio::test]
async fn doi_not_found_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("DOI not found"))
        .mount(&server)
        .await;

    let client = CitationClient::new(reqwest::Client::new(), server.uri(), server.uri());
    let result = client
        .lookup(&CitationTarget::Doi("10.9999/missing".to_string()))
        .await;
    assert!(matches!(result, Err(ClientError::Status(404, _))));
}

// =============================================================================
// MAIL
// =============================================================================

fn email() -> Email {
    Email {
        to: Recipients::parse("list@example.edu"),
        subject: "Reminder: Library learning".to_string(),
        body: "<p>See you there!</p>".to_string(),
        html: true,
    }
}

#[tokio::test]
async fn mailer_posts_base64url_raw_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(header_regex("Authorization", "Bearer mail-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(
        reqwest::Client::new(),
        format!("{}/send", server.uri()),
        "Group <group@example.edu>",
        Some("mail-token".to_string()),
    );
    mailer.send(&email()).await.unwrap();

    let request = &server.received_requests().await.unwrap()[0];
    let body = request.body_json::<serde_json::Value>().unwrap();
    let raw = URL_SAFE.decode(body["raw"].as_str().unwrap()).unwrap();
    let message = String::from_utf8(raw).unwrap();

    assert!(message.contains("From: Group <group@example.edu>\r\n"));
    assert!(message.contains("To: list@example.edu\r\n"));
    assert!(message.contains("Subject: Reminder: Library learning\r\n"));
    assert!(message.contains("Content-Type: text/html"));
    assert!(message.ends_with("<p>See you there!</p>\r\n"));
}

#[tokio::test]
async fn mailer_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(reqwest::Client::new(), server.uri(), "", None);
    let result = mailer.send(&email()).await;
    assert!(matches!(result, Err(ClientError::Status(500, ref body)) if body == "backend down"));
}

#[tokio::test]
async fn mailer_falls_back_to_sender_without_recipients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = HttpMailer::new(
        reqwest::Client::new(),
        format!("{}/send", server.uri()),
        "Group <group@example.edu>",
        None,
    );
    let mut message = email();
    message.to = Recipients::default();
    mailer.send(&message).await.unwrap();

    let request = &server.received_requests().await.unwrap()[0];
    let body = request.body_json::<serde_json::Value>().unwrap();
    let raw = URL_SAFE.decode(body["raw"].as_str().unwrap()).unwrap();
    let message = String::from_utf8(raw).unwrap();
    assert!(message.contains("To: group@example.edu\r\n"));
}

#[tokio::test]
async fn mailer_refuses_empty_recipients_without_sender() {
    let mailer = HttpMailer::new(reqwest::Client::new(), "http://127.0.0.1:1", "", None);
    let mut message = email();
    message.to = Recipients::default();
    assert!(matches!(
        mailer.send(&message).await,
        Err(ClientError::NotConfigured(_))
    ));
}
