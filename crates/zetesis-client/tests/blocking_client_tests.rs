use std::collections::HashMap;
use std::time::Duration;

use mockito::Matcher;
use zetesis_client::blocking::Client;
use zetesis_client::ClientConfig;
use zetesis_types::{Error, ExportFormat, SearchRequest};

fn client_for(server: &mockito::ServerGuard) -> Client {
    let config = ClientConfig::builder()
        .base_url(server.url())
        .timeout(Duration::from_secs(5))
        .retry_base_delay(Duration::from_millis(5))
        .build()
        .unwrap();
    Client::new(config, HashMap::new()).unwrap()
}

#[test]
fn blocking_search_parses_the_response() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "query": "hello",
            "mode": "auto",
        })))
        .with_status(200)
        .with_body(r#"{"answer": "hi", "mode": "auto"}"#)
        .create();

    let client = client_for(&server);
    let result = client.search(&SearchRequest::new("hello")).unwrap();

    mock.assert();
    assert_eq!(result.answer, "hi");
    assert_eq!(result.mode, "auto");
}

#[test]
fn blocking_search_maps_rate_limits() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/search")
        .with_status(429)
        .create();

    let client = client_for(&server);
    let err = client.search(&SearchRequest::new("q")).unwrap_err();
    assert!(matches!(err, Error::RateLimit(_)));
}

#[test]
fn blocking_stream_skips_malformed_lines() {
    let body = "{\"chunk\": \"a\"}\nbroken\n{\"chunk\": \"b\"}\n";
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/search/stream")
        .with_status(200)
        .with_body(body)
        .create();

    let client = client_for(&server);
    let fragments: Vec<_> = client
        .search_stream(&SearchRequest::new("q"))
        .unwrap()
        .collect::<zetesis_types::Result<Vec<_>>>()
        .unwrap();

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0]["chunk"], "a");
    assert_eq!(fragments[1]["chunk"], "b");
}

#[test]
fn blocking_conversation_flow_records_and_exports() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/search")
        .with_status(200)
        .with_body(r#"{"answer": "an answer"}"#)
        .expect(2)
        .create();

    let client = client_for(&server);
    let conversation = client.start_conversation();

    client
        .search_in(&conversation, &SearchRequest::new("first question"))
        .unwrap();
    client
        .search_in(&conversation, &SearchRequest::new("second question"))
        .unwrap();

    let conv = client.conversation(&conversation).unwrap();
    assert_eq!(conv.messages.len(), 4);

    let text = client
        .export_conversation(&conversation, ExportFormat::Text)
        .unwrap();
    assert!(text.starts_with("Q: first question\n"));
    assert!(text.contains("A: an answer\n"));

    assert!(client.end_conversation(&conversation));
    assert!(client.conversation(&conversation).is_none());
}
