use super::*;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Instant;

/// OpenAI provider implementation
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider, optionally pointed at a compatible endpoint
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

fn to_openai_message(message: &ChatMessage) -> LlmResult<ChatCompletionRequestMessage> {
    let converted: ChatCompletionRequestMessage = match message.role {
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        let start = Instant::now();

        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(request.messages.len() + 1);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()
                .map_err(|e| LlmError::ApiError(e.to_string()))?
                .into(),
        );
        for message in &request.messages {
            messages.push(to_openai_message(message)?);
        }

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder.model(&self.model).messages(messages);

        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_tokens(max_tokens);
        }

        let chat_request = req_builder
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        // Execute with timeout
        let response =
            tokio::time::timeout(request.timeout, self.client.chat().create(chat_request))
                .await
                .map_err(|_| LlmError::Timeout(request.timeout))?
                .map_err(|e| LlmError::ApiError(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::ParseError("No content in response".to_string()))?;

        Ok(ChatResponse {
            text: text.trim().to_string(),
            metadata: ResponseMetadata {
                provider: "openai".to_string(),
                model: self.model.clone(),
                tokens_used: response.usage.map(|u| u.total_tokens),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
