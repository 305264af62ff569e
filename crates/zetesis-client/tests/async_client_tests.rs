use std::collections::HashMap;
use std::time::Duration;

use futures::StreamExt;
use mockito::Matcher;
use zetesis_client::{AsyncClient, ClientConfig};
use zetesis_types::{AiModel, Error, SearchMode, SearchRequest};

fn client_for(server: &mockito::ServerGuard) -> AsyncClient {
    let config = ClientConfig::builder()
        .base_url(server.url())
        .timeout(Duration::from_secs(5))
        .retry_base_delay(Duration::from_millis(5))
        .build()
        .unwrap();
    AsyncClient::new(config, HashMap::new()).unwrap()
}

#[tokio::test]
async fn direct_search_parses_the_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "query": "What is quantum computing?",
            "mode": "auto",
            "language": "en-US",
            "incognito": false,
            "sources": ["web"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "answer": "Computation with qubits.",
                "sources": [{"title": "Intro", "url": "https://intro"}],
                "related_questions": ["What is a qubit?"],
                "mode": "auto",
                "tokens_used": 42
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .search(&SearchRequest::new("What is quantum computing?"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.answer, "Computation with qubits.");
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.related_questions, vec!["What is a qubit?"]);
    assert_eq!(result.tokens_used, Some(42));
    assert_eq!(result.raw["answer"], "Computation with qubits.");
}

#[tokio::test]
async fn invalid_pairing_fails_without_any_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/search")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = SearchRequest::new("q")
        .mode(SearchMode::Auto)
        .model(AiModel::Sonar);

    let err = client.search(&request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    for status in [401, 429, 400, 503] {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/search")
            .with_status(status)
            .with_body("nope")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.search(&SearchRequest::new("q")).await.unwrap_err();
        let matched = match status {
            401 => matches!(err, Error::Authentication(_)),
            429 => matches!(err, Error::RateLimit(_)),
            400 => matches!(err, Error::InvalidParameter(_)),
            _ => matches!(err, Error::Service { status: 503, .. }),
        };
        assert!(matched, "status {status} mapped unexpectedly");
    }
}

#[tokio::test]
async fn bad_request_error_carries_the_response_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/search")
        .with_status(400)
        .with_body("unknown source type")
        .create_async()
        .await;

    let client = client_for(&server);
    match client.search(&SearchRequest::new("q")).await.unwrap_err() {
        Error::InvalidParameter(msg) => assert!(msg.contains("unknown source type")),
        other => panic!("expected invalid parameter, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_failures_exhaust_the_retry_budget() {
    // Nothing listens on the discard port; every attempt is a connect error.
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(1))
        .max_retries(2)
        .retry_base_delay(Duration::from_millis(5))
        .build()
        .unwrap();
    let client = AsyncClient::new(config, HashMap::new()).unwrap();

    match client.search(&SearchRequest::new("q")).await.unwrap_err() {
        Error::Network(msg) => assert!(msg.contains("max retries exceeded")),
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_preserves_input_order_with_per_slot_errors() {
    let mut server = mockito::Server::new_async().await;
    for (query, answer) in [("q1", "a1"), ("q3", "a3"), ("q4", "a4")] {
        server
            .mock("POST", "/api/search")
            .match_body(Matcher::PartialJson(serde_json::json!({"query": query})))
            .with_status(200)
            .with_body(format!(r#"{{"answer": "{answer}"}}"#))
            .create_async()
            .await;
    }
    // Query #2 is engineered to fail server-side.
    server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(serde_json::json!({"query": "q2"})))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    let requests: Vec<SearchRequest> = ["q1", "q2", "q3", "q4"]
        .into_iter()
        .map(SearchRequest::new)
        .collect();

    let results = client.batch_search(&requests).await;
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().answer, "a1");
    assert!(matches!(
        results[1].as_ref().unwrap_err(),
        Error::Service { status: 500, .. }
    ));
    assert_eq!(results[2].as_ref().unwrap().answer, "a3");
    assert_eq!(results[3].as_ref().unwrap().answer, "a4");
}

#[tokio::test]
async fn streaming_yields_fragments_and_skips_malformed_lines() {
    let body = concat!(
        "{\"chunk\": \"The\"}\n",
        "this line is garbage\n",
        "{\"chunk\": \" answer\"}\n",
        "{\"done\": true}",
    );

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/search/stream")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut stream = client
        .search_stream(&SearchRequest::new("q"))
        .await
        .unwrap();

    let mut fragments = Vec::new();
    while let Some(fragment) = stream.next().await {
        fragments.push(fragment.unwrap());
    }

    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0]["chunk"], "The");
    assert_eq!(fragments[1]["chunk"], " answer");
    assert_eq!(fragments[2]["done"], true);
}

#[tokio::test]
async fn streaming_maps_error_statuses_before_yielding() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/search/stream")
        .with_status(429)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = match client.search_stream(&SearchRequest::new("q")).await {
        Ok(_) => panic!("called `Result::unwrap_err()` on an `Ok` value"),
        Err(e) => e,
    };
    assert!(matches!(err, Error::RateLimit(_)));
}

#[tokio::test]
async fn search_in_attaches_context_and_records_the_exchange() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(serde_json::json!({"query": "first"})))
        .with_status(200)
        .with_body(r#"{"answer": "one"}"#)
        .create_async()
        .await;
    // The follow-up must carry the recorded context from the first exchange.
    let second = server
        .mock("POST", "/api/search")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({"query": "second"})),
            Matcher::Regex("\"follow_up\"".to_string()),
            Matcher::Regex("\"one\"".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"answer": "two"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let conversation = client.start_conversation();

    client
        .search_in(&conversation, &SearchRequest::new("first"))
        .await
        .unwrap();
    let conv = client.conversation(&conversation).unwrap();
    assert_eq!(conv.messages.len(), 2);
    assert_eq!(conv.messages[0].content, "first");
    assert_eq!(conv.messages[1].content, "one");

    client
        .search_in(&conversation, &SearchRequest::new("second"))
        .await
        .unwrap();
    let conv = client.conversation(&conversation).unwrap();
    assert_eq!(conv.messages.len(), 4);

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn unknown_conversation_handles_are_rejected() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);

    let stale = zetesis_types::ConversationId::new();
    let err = client
        .search_in(&stale, &SearchRequest::new("q"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    assert!(!client.end_conversation(&stale));
}
