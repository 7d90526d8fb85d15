//! Agent integration tests: tool calling against a mocked weather API,
//! session state flowing through the code pipeline, and the runner.

mod common;

use agentlab::agents::demos::{code_pipeline, weather_time_agent};
use agentlab::agents::{AgentEventKind, AgentKind, Runner};
use agentlab::cli::commands::run_agents;
use agentlab::cli::output::Output;
use agentlab::tools::WeatherApiClient;
use agentlab::types::{MessageRole, ToolCall};
use agentlab::LLMResponse;
use common::mocks::{tool_call_response, MockLLMClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_payload() -> serde_json::Value {
    json!({
        "location": {
            "name": "Tokyo",
            "country": "Japan",
            "tz_id": "Asia/Tokyo",
            "localtime": "2025-05-01 09:30"
        },
        "current": {
            "temp_c": 21,
            "temp_f": 70,
            "humidity": 40,
            "wind_kph": 12,
            "condition": { "text": "Sunny" }
        }
    })
}

#[tokio::test]
async fn test_weather_agent_calls_tool_and_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Tokyo"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let llm = MockLLMClient::scripted(
        vec![tool_call_response("call_1", "get_weather", json!({ "city": "东京" }))],
        "It is sunny in Tokyo.",
    )
    .into_arc();
    let agent = weather_time_agent(llm.clone(), WeatherApiClient::new("test-key", server.uri()));

    let output = Runner::new(Arc::new(agent))
        .run("东京天气怎么样?")
        .await
        .unwrap();

    assert_eq!(output.final_response, "It is sunny in Tokyo.");

    let result = output
        .events
        .iter()
        .find_map(|e| match &e.kind {
            AgentEventKind::ToolResult { result, .. } => Some(result.clone()),
            _ => None,
        })
        .expect("tool result event");
    assert_eq!(result["status"], "success");
    assert_eq!(
        result["report"],
        "Current weather in 东京 (Japan) is Sunny, temperature 21°C (70°F), humidity 40%, wind speed 12 km/h."
    );

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].tool_names.contains(&"get_weather".to_string()));
    assert!(calls[0].tool_names.contains(&"get_current_time".to_string()));
    let tool_message = calls[1]
        .messages
        .iter()
        .find(|m| m.role == MessageRole::Tool)
        .expect("tool message fed back");
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
    assert!(tool_message.content.contains("Sunny"));
}

#[tokio::test]
async fn test_weather_agent_reports_api_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let llm = MockLLMClient::scripted(
        vec![tool_call_response("c1", "get_current_time", json!({ "city": "Atlantis" }))],
        "I could not find that city.",
    )
    .into_arc();
    let agent = weather_time_agent(llm.clone(), WeatherApiClient::new("k", server.uri()));

    let output = Runner::new(Arc::new(agent)).run("Time in Atlantis?").await.unwrap();

    let result = output
        .events
        .iter()
        .find_map(|e| match &e.kind {
            AgentEventKind::ToolResult { result, .. } => Some(result.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(result["status"], "error");
    assert!(result["error_message"]
        .as_str()
        .unwrap()
        .contains("API response code: 400"));
}

#[tokio::test]
async fn test_code_pipeline_fills_state_in_order() {
    let llm = MockLLMClient::scripted(
        vec![
            LLMResponse::text("print('hi')"),
            LLMResponse::text("Add a main guard."),
            LLMResponse::text("if __name__ == '__main__':\n    print('hi')"),
        ],
        "unused",
    )
    .into_arc();

    let output = Runner::new(Arc::new(code_pipeline(llm.clone())))
        .run("Print hi")
        .await
        .unwrap();

    assert_eq!(output.state["generated_code"], "print('hi')");
    assert_eq!(output.state["review_comments"], "Add a main guard.");
    assert!(output.state["refactored_code"].starts_with("if __name__"));
    assert_eq!(output.final_response, output.state["refactored_code"]);

    let calls = llm.calls();
    assert_eq!(calls.len(), 3);
    let reviewer_system = calls[1].system().unwrap();
    assert!(reviewer_system.contains("print('hi')"));
    let refactorer_system = calls[2].system().unwrap();
    assert!(refactorer_system.contains("Add a main guard."));
    assert!(!refactorer_system.contains("{review_comments}"));
}

#[tokio::test]
async fn test_run_agents_all_runs_three_kinds() {
    let llm = MockLLMClient::new("ok").into_arc();
    let weather = WeatherApiClient::new("k", "http://127.0.0.1:9");

    let runs = run_agents(
        &Output::no_color(),
        llm.clone(),
        weather,
        AgentKind::All,
        Some("hello"),
    )
    .await
    .unwrap();

    assert_eq!(runs.len(), 3);
    // simple (1) + weather (1) + code pipeline (3)
    assert_eq!(llm.call_count(), 5);
    assert!(runs.iter().all(|r| r.final_response == "ok"));
    assert_ne!(runs[0].session_id, runs[1].session_id);
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let llm = MockLLMClient::failing().into_arc();
    let agent = weather_time_agent(llm, WeatherApiClient::new("k", "http://127.0.0.1:9"));
    let err = Runner::new(Arc::new(agent)).run("hi").await.unwrap_err();
    assert!(err.to_string().contains("Mock LLM failure"));
}

#[tokio::test]
async fn test_tool_loop_bound_forces_final_answer_without_tools() {
    let llm = MockLLMClient::scripted(
        vec![
            tool_call_response("c1", "get_current_time", json!({ "city": "Paris" })),
            tool_call_response("c2", "get_current_time", json!({ "city": "Paris" })),
            tool_call_response("c3", "get_current_time", json!({ "city": "Paris" })),
        ],
        "unused",
    )
    .into_arc();
    let agent = weather_time_agent(llm.clone(), WeatherApiClient::new("k", "http://127.0.0.1:9"))
        .with_max_tool_iterations(2);

    Runner::new(Arc::new(agent)).run("Time in Paris?").await.unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 3);
    assert!(!calls[0].tool_names.is_empty());
    assert!(!calls[1].tool_names.is_empty());
    assert!(calls[2].tool_names.is_empty());
    let tool_messages = calls[2]
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .count();
    assert_eq!(tool_messages, 2);
}

#[tokio::test]
async fn test_tool_errors_are_fed_back_as_payloads() {
    let llm = MockLLMClient::scripted(
        vec![LLMResponse {
            content: String::new(),
            tool_calls: vec![
                ToolCall {
                    id: "c1".to_string(),
                    name: "get_stock_price".to_string(),
                    arguments: json!({ "symbol": "ACME" }),
                },
                ToolCall {
                    id: "c2".to_string(),
                    name: "get_weather".to_string(),
                    arguments: json!({}),
                },
            ],
            finish_reason: "tool_calls".to_string(),
        }],
        "Sorry, I could not look that up.",
    )
    .into_arc();
    let agent = weather_time_agent(llm.clone(), WeatherApiClient::new("k", "http://127.0.0.1:9"));

    let output = Runner::new(Arc::new(agent)).run("Stocks?").await.unwrap();
    assert_eq!(output.final_response, "Sorry, I could not look that up.");

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    let payloads: Vec<serde_json::Value> = calls[1]
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .map(|m| serde_json::from_str(&m.content).unwrap())
        .collect();
    assert_eq!(payloads.len(), 2);

    assert_eq!(payloads[0]["status"], "error");
    assert_eq!(
        payloads[0]["error_message"],
        "Not found: Tool not found: get_stock_price"
    );
    assert_eq!(payloads[1]["status"], "error");
    assert_eq!(
        payloads[1]["error_message"],
        "Invalid input: Missing required argument: city"
    );
}
