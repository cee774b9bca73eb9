//! Live calls against the LLM providers. Run with `--features api`.

use strictly_cricket::{
    LlmClient, LlmConfig, LlmInsightSource, LlmLiveFeed, LlmProvider, LiveFeed, MatchSetup,
    ScorerConfig, INSIGHT_FAILED, generate_insight,
};
use tracing::instrument;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");

    let config = LlmConfig::new(
        LlmProvider::Anthropic,
        api_key,
        "claude-3-5-haiku-latest".to_string(),
        50,
    );

    let client = LlmClient::new(config).expect("Failed to build client");

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");

    let config = LlmConfig::new(LlmProvider::OpenAI, api_key, "gpt-4o-mini".to_string(), 50);

    let client = LlmClient::new(config).expect("Failed to build client");

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_insight_for_fresh_match() {
    dotenvy::dotenv().ok();

    let config = ScorerConfig::default()
        .create_llm_config()
        .expect("API key not set");
    let source = LlmInsightSource::new(LlmClient::new(config).expect("Failed to build client"));
    let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
        .create_match()
        .expect("Valid setup");

    let insight = generate_insight(&source, &game).await;
    assert_ne!(insight, INSIGHT_FAILED);
    eprintln!("Insight: {}", insight);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_live_feed_returns_parseable_list() {
    dotenvy::dotenv().ok();

    let config = ScorerConfig::default()
        .create_llm_config()
        .expect("API key not set");
    let feed = LlmLiveFeed::new(LlmClient::new(config).expect("Failed to build client"));

    let matches = feed.fetch().await.expect("Feed failed");
    eprintln!("Live matches: {}", matches.len());
}
