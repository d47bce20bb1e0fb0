use joke_agent_rs::{
    tools::humor_api::ERROR_PREFIX, AppConfig, Credentials, HumorApiTool, JokeGenerator,
    ProbeOutcome, SourceKind, Tool,
};
use mockito::Matcher;
use serde_json::json;

fn joke_query(api_key: &str, category: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("api-key".into(), api_key.into()),
        Matcher::UrlEncoded("category".into(), category.into()),
    ])
}

#[tokio::test]
async fn test_returns_joke_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/jokes/random")
        .match_query(joke_query("humor-key", "food"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 42, "joke": "X"}"#)
        .create_async()
        .await;

    let tool = HumorApiTool::new("humor-key").with_base_url(server.url());
    let joke = tool.execute(json!({"category": "food"})).await.unwrap();

    assert_eq!(joke, "X");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_becomes_error_string() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/jokes/random")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "invalid api key"}"#)
        .create_async()
        .await;

    let tool = HumorApiTool::new("wrong").with_base_url(server.url());
    let joke = tool.execute(json!({"category": "food"})).await.unwrap();

    assert!(joke.starts_with(ERROR_PREFIX), "{joke}");
    assert!(joke.contains("401"));
}

#[tokio::test]
async fn test_error_string_does_not_reveal_api_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/jokes/random")
        .match_query(joke_query("humor-SUPERSECRET", "food"))
        .with_status(401)
        .with_body(r#"{"message": "invalid api key"}"#)
        .create_async()
        .await;

    let tool = HumorApiTool::new("humor-SUPERSECRET").with_base_url(server.url());
    let joke = tool.fetch_joke("food").await;

    assert!(joke.starts_with(ERROR_PREFIX), "{joke}");
    assert!(!joke.contains("SUPERSECRET"), "{joke}");
    assert!(!joke.contains("api-key="), "{joke}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_joke_field_becomes_error_string() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/jokes/random")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text": "no joke here"}"#)
        .create_async()
        .await;

    let tool = HumorApiTool::new("humor-key").with_base_url(server.url());
    let joke = tool.fetch_joke("food").await;

    assert!(joke.starts_with("Error generating joke: "), "{joke}");
}

#[tokio::test]
async fn test_remote_generator_passes_free_text_category() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/jokes/random")
        .match_query(joke_query("humor-key", "dark humor"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"joke": "A remote joke"}"#)
        .create_async()
        .await;

    let config = AppConfig::default()
        .with_source(SourceKind::Remote)
        .with_humor_base_url(server.url())
        .with_timeout_secs(Some(5));
    let mut credentials = Credentials::new()
        .with_openai_api_key("sk-test")
        .with_humor_api_key("humor-key");
    credentials.set_verification(ProbeOutcome::Accepted.into());

    let generation = JokeGenerator::new(config)
        .trigger(&credentials, "dark humor")
        .await;

    assert_eq!(generation.joke(), Some("A remote joke"));
    mock.assert_async().await;
}
