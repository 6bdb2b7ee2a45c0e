//! OpenAI client struct, request building, and chunk decoding.

use confbot_config::schema::ApiFlavor;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AiError, CompletionDelta, Message, Sender, TokenUsage, ToolCallDelta, ToolDefinition};

use super::config::OpenAiConfig;

/// Terminal data payload of an OpenAI stream.
pub(crate) const DONE_MARKER: &str = "[DONE]";

/// OpenAI / Azure OpenAI chat completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
    pub(crate) url: String,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        let url = config.completions_url();
        Ok(Self { config, http, url })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build auth headers for the configured flavor.
    pub(crate) fn auth_headers(&self) -> Result<HeaderMap, AiError> {
        let invalid = |_| AiError::ApiError("API key contains invalid header characters".into());
        let mut headers = HeaderMap::new();
        match self.config.flavor {
            ApiFlavor::OpenAi => {
                let value = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
                    .map_err(invalid)?;
                headers.insert(AUTHORIZATION, value);
            }
            ApiFlavor::Azure => {
                let value = HeaderValue::from_str(&self.config.api_key).map_err(invalid)?;
                headers.insert("api-key", value);
            }
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Build the JSON request body for a streaming chat completion.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Value {
        let mut msgs = Vec::with_capacity(messages.len() + 1);
        if let Some(ref system) = self.config.system_prompt {
            msgs.push(json!({ "role": "system", "content": system }));
        }
        msgs.extend(messages.iter().map(to_openai_message));

        let mut body = json!({
            "messages": msgs,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": true,
        });

        // Azure selects the model through the deployment in the URL.
        if self.config.flavor == ApiFlavor::OpenAi {
            body["model"] = json!(self.config.model);
            body["stream_options"] = json!({ "include_usage": true });
        }

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_openai_tool).collect();
            body["tools"] = json!(tool_defs);
        }

        body
    }
}

fn to_openai_message(msg: &Message) -> Value {
    match msg.sender {
        Sender::User => json!({ "role": "user", "content": msg.content }),
        Sender::Assistant if msg.is_tool_request() => {
            let calls: Vec<_> = msg
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments },
                    })
                })
                .collect();
            let content = if msg.content.is_empty() {
                Value::Null
            } else {
                json!(msg.content)
            };
            json!({ "role": "assistant", "content": content, "tool_calls": calls })
        }
        Sender::Assistant => json!({ "role": "assistant", "content": msg.content }),
        Sender::Tool => json!({
            "role": "tool",
            "tool_call_id": msg.tool_call_id,
            "content": msg.content,
        }),
    }
}

/// Convert a tool definition to the `tools` array format.
pub fn to_openai_tool(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChunkData {
    choices: Option<Vec<Choice>>,
    usage: Option<ChunkUsage>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
    tool_calls: Option<Vec<ChunkToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChunkToolCall {
    #[serde(default)]
    index: u32,
    id: Option<String>,
    function: Option<ChunkFunction>,
}

#[derive(Debug, Deserialize)]
struct ChunkFunction {
    name: Option<String>,
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Decode one `data:` payload of the stream.
///
/// `Ok(None)` means the payload carries nothing for the caller (the
/// `[DONE]` marker, or a chunk with neither choices nor usage).
pub(crate) fn decode_chunk(data: &str) -> Result<Option<CompletionDelta>, AiError> {
    let data = data.trim();
    if data == DONE_MARKER {
        return Ok(None);
    }

    let chunk: ChunkData =
        serde_json::from_str(data).map_err(|e| AiError::ParseError(e.to_string()))?;

    if let Some(error) = chunk.error {
        let message = error["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(AiError::ApiError(message));
    }

    let usage = chunk.usage.map(|u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    // Usage-only chunks arrive with `choices: []`.
    let Some(choice) = chunk.choices.unwrap_or_default().into_iter().next() else {
        return Ok(usage.map(|usage| CompletionDelta {
            usage: Some(usage),
            ..Default::default()
        }));
    };

    let delta = choice.delta.unwrap_or_default();
    let tool_calls = delta
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let (name, arguments) = match call.function {
                Some(f) => (f.name, f.arguments),
                None => (None, None),
            };
            ToolCallDelta {
                index: call.index,
                id: call.id,
                name,
                arguments,
            }
        })
        .collect();

    Ok(Some(CompletionDelta {
        content: delta.content,
        tool_calls,
        finish_reason: choice.finish_reason,
        usage,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolCall;

    fn client(flavor: ApiFlavor) -> OpenAiClient {
        let mut config = OpenAiConfig::new("sk-test");
        config.flavor = flavor;
        config.system_prompt = Some("You answer questions about the conference.".into());
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn body_prepends_system_prompt_and_maps_roles() {
        let client = client(ApiFlavor::OpenAi);
        let call = ToolCall {
            id: "call_1".into(),
            name: "getExperts".into(),
            arguments: "{}".into(),
        };
        let messages = vec![
            Message::user("Who is speaking?"),
            Message::tool_request("", vec![call]),
            Message {
                sender: Sender::Tool,
                content: "[]".into(),
                tool_call_id: Some("call_1".into()),
                tool_calls: Vec::new(),
            },
        ];
        let body = client.build_request_body(&messages, &[]);
        let msgs = body["messages"].as_array().unwrap();

        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["role"], "user");
        assert_eq!(msgs[2]["role"], "assistant");
        assert!(msgs[2]["content"].is_null());
        assert_eq!(msgs[2]["tool_calls"][0]["function"]["name"], "getExperts");
        assert_eq!(msgs[3]["role"], "tool");
        assert_eq!(msgs[3]["tool_call_id"], "call_1");
        assert_eq!(body["stream"], true);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn azure_body_omits_model() {
        let client = client(ApiFlavor::Azure);
        let body = client.build_request_body(&[Message::user("hi")], &[]);
        assert!(body.get("model").is_none());
        assert!(body.get("stream_options").is_none());
    }

    #[test]
    fn tools_are_wrapped_as_functions() {
        let client = client(ApiFlavor::OpenAi);
        let tool = ToolDefinition {
            name: "getExperts".into(),
            description: "List experts".into(),
            parameters: json!({"type": "object", "properties": {}}),
        };
        let body = client.build_request_body(&[Message::user("hi")], &[tool]);
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "getExperts");
    }

    #[test]
    fn auth_header_depends_on_flavor() {
        let headers = client(ApiFlavor::OpenAi).auth_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");

        let headers = client(ApiFlavor::Azure).auth_headers().unwrap();
        assert_eq!(headers["api-key"], "sk-test");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn decodes_text_chunk() {
        let delta = decode_chunk(r#"{"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hel"));
        assert!(delta.tool_calls.is_empty());
    }

    #[test]
    fn explicit_nulls_keep_the_text() {
        let data = r#"{"choices":[{"index":0,"delta":{"content":"Hi","tool_calls":null},"finish_reason":null}]}"#;
        let delta = decode_chunk(data).unwrap().unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hi"));
        assert!(delta.tool_calls.is_empty());

        assert!(decode_chunk(r#"{"choices":null,"usage":null}"#).unwrap().is_none());
    }

    #[test]
    fn decodes_tool_call_fragment() {
        let data = r#"{"choices":[{"index":0,"delta":{"tool_calls":[
            {"index":0,"id":"call_9","type":"function","function":{"name":"getSessionsByExpert","arguments":"{\"fore"}}
        ]},"finish_reason":null}]}"#;
        let delta = decode_chunk(data).unwrap().unwrap();
        assert_eq!(
            delta.tool_calls,
            vec![ToolCallDelta {
                index: 0,
                id: Some("call_9".into()),
                name: Some("getSessionsByExpert".into()),
                arguments: Some("{\"fore".into()),
            }]
        );
    }

    #[test]
    fn decodes_usage_only_chunk() {
        let delta = decode_chunk(r#"{"choices":[],"usage":{"prompt_tokens":12,"completion_tokens":3,"total_tokens":15}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            delta.usage,
            Some(TokenUsage {
                input_tokens: 12,
                output_tokens: 3
            })
        );
    }

    #[test]
    fn done_marker_and_empty_chunks_carry_nothing() {
        assert!(decode_chunk("[DONE]").unwrap().is_none());
        assert!(decode_chunk(r#"{"choices":[]}"#).unwrap().is_none());
    }

    #[test]
    fn error_payload_is_api_error() {
        let err = decode_chunk(r#"{"error":{"message":"content filtered"}}"#).unwrap_err();
        assert!(matches!(err, AiError::ApiError(ref m) if m == "content filtered"));
    }

    #[test]
    fn malformed_chunk_is_parse_error() {
        assert!(matches!(
            decode_chunk("{not json"),
            Err(AiError::ParseError(_))
        ));
    }
}
