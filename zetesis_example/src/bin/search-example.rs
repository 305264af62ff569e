use anyhow::Result;
use futures::StreamExt;
use zetesis::prelude::*;

/// Parse "name=value; name2=value2" from ZETESIS_COOKIES.
fn cookies_from_env() -> std::collections::HashMap<String, String> {
    std::env::var("ZETESIS_COOKIES")
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Zetesis - Search Example");
    println!("========================\n");

    // 1. Build a client from session cookies
    println!("1. Building client...");
    let cookies = cookies_from_env();
    if cookies.is_empty() {
        anyhow::bail!("set ZETESIS_COOKIES, e.g. ZETESIS_COOKIES='session=your-token'");
    }
    let client = ClientBuilder::new().cookies(cookies).build()?;
    println!("   ✓ Client ready\n");

    // 2. Direct search
    println!("2. Direct search...");
    let result = client
        .search(&SearchRequest::new("What is quantum computing?"))
        .await?;
    println!("   Answer: {}", result.answer);
    for (idx, source) in result.sources.iter().enumerate() {
        let title = source.get("title").and_then(|t| t.as_str()).unwrap_or("?");
        println!("   [{}] {}", idx + 1, title);
    }
    if !result.related_questions.is_empty() {
        println!("   Related: {:?}", result.related_questions);
    }
    println!();

    // 3. Pro mode with an explicit model
    println!("3. Pro search with a specific model...");
    let request = SearchRequest::new("Compare Rust and Go for network services")
        .mode(SearchMode::Pro)
        .model(AiModel::Sonar)
        .sources(vec![SourceType::Web, SourceType::Scholar]);
    let result = client.search(&request).await?;
    println!("   Answer: {}\n", result.answer);

    // 4. Streaming search
    println!("4. Streaming search...");
    let mut stream = client
        .search_stream(&SearchRequest::new("Explain Rust ownership"))
        .await?;
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        if let Some(chunk) = fragment.get("chunk").and_then(|c| c.as_str()) {
            print!("{chunk}");
        }
    }
    println!("\n");

    // 5. Concurrent batch: results come back in input order, failures stay
    // in their slot.
    println!("5. Concurrent batch...");
    let queries: Vec<SearchRequest> = [
        "What is WebAssembly?",
        "What is eBPF?",
        "What is io_uring?",
    ]
    .into_iter()
    .map(SearchRequest::new)
    .collect();

    for (query, outcome) in queries.iter().zip(client.batch_search(&queries).await) {
        match outcome {
            Ok(result) => println!("   {} -> {} chars", query.query, result.answer.len()),
            Err(err) => println!("   {} -> failed: {err}", query.query),
        }
    }

    println!("\nDone.");
    Ok(())
}
