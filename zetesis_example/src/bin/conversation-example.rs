use anyhow::Result;
use zetesis::auth::CookieStore;
use zetesis::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Zetesis - Conversations & Cookie Profiles");
    println!("=========================================\n");

    // 1. Load cookies from a saved profile
    println!("1. Loading cookie profile...");
    let store = CookieStore::new("cookies.json");
    let profiles = store.list();
    println!("   Saved profiles: {profiles:?}");

    let client = ClientBuilder::new()
        .profile("cookies.json", "default")
        .build()?;
    println!("   ✓ Client ready\n");

    // 2. Start a conversation and ask a follow-up: the second query carries
    // the first exchange as context.
    println!("2. Multi-turn conversation...");
    let conversation = client.start_conversation();

    let first = client
        .search_in(&conversation, &SearchRequest::new("What is quantum computing?"))
        .await?;
    println!("   Q1 answered ({} chars)", first.answer.len());

    let second = client
        .search_in(
            &conversation,
            &SearchRequest::new("What are its main applications?"),
        )
        .await?;
    println!("   Q2 answered ({} chars)\n", second.answer.len());

    // 3. Inspect the recorded history
    println!("3. Conversation history...");
    let conv = client
        .conversation(&conversation)
        .expect("conversation exists");
    for message in &conv.messages {
        println!("   [{}] {} chars", message.role, message.content.len());
    }
    println!();

    // 4. Export in each format
    println!("4. Exports...");
    let transcript = client.export_conversation(&conversation, ExportFormat::Text)?;
    println!("--- transcript ---\n{transcript}");

    let markdown = client.export_conversation(&conversation, ExportFormat::Markdown)?;
    std::fs::write("conversation.md", &markdown)?;
    println!("   ✓ Markdown written to conversation.md\n");

    // 5. Save the session cookies under a new profile for next time
    println!("5. Saving cookie profile...");
    store.save(&client.cookies(), "last-session")?;
    println!("   ✓ Saved as 'last-session'");

    Ok(())
}
