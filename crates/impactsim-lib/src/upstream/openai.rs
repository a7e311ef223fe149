use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::{build_client, read_json, send};
use super::{ChatRequest, GenerativeProvider, ImageEditRequest, GENERATIVE_SERVICE};
use crate::config::{ProviderConfig, ServiceConfig};
use crate::error::{Error, Result};

const PNG_MIME: &str = "image/png";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// OpenAI chat completion and image edit client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenAiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.upstream_timeout)?,
            config: config.openai.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn png_part(bytes: Vec<u8>, file_name: String) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(PNG_MIME)
        .map_err(|e| Error::upstream(GENERATIVE_SERVICE, format!("invalid part: {}", e)))
}

fn first_message(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            Error::upstream(
                GENERATIVE_SERVICE,
                "unexpected response shape: no message content",
            )
        })
}

fn first_url(response: ImagesResponse) -> Result<String> {
    response
        .data
        .into_iter()
        .next()
        .and_then(|image| image.url)
        .ok_or_else(|| {
            Error::upstream(GENERATIVE_SERVICE, "unexpected response shape: no image url")
        })
}

impl GenerativeProvider for OpenAiClient {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String> {
        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "requesting chat completion"
        );

        let response = send(
            GENERATIVE_SERVICE,
            self.client
                .post(self.endpoint("chat/completions"))
                .bearer_auth(self.config.key())
                .json(&request),
        )
        .await?;

        first_message(read_json(GENERATIVE_SERVICE, response).await?)
    }

    async fn edit_image(&self, request: ImageEditRequest) -> Result<String> {
        debug!(
            image = %request.image_name,
            image_bytes = request.image.len(),
            mask_bytes = request.mask.len(),
            "submitting image edit"
        );

        let form = Form::new()
            .part("image", png_part(request.image, request.image_name)?)
            .part("mask", png_part(request.mask, "mask.png".to_string())?)
            .text("prompt", request.prompt)
            .text("n", "1")
            .text("size", request.size);

        let response = send(
            GENERATIVE_SERVICE,
            self.client
                .post(self.endpoint("images/edits"))
                .bearer_auth(self.config.key())
                .multipart(form),
        )
        .await?;

        first_url(read_json(GENERATIVE_SERVICE, response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let mut config = ServiceConfig::default();
        config.openai.base_url = "http://localhost:9000/v1/".to_string();
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("images/edits"),
            "http://localhost:9000/v1/images/edits"
        );
    }

    #[test]
    fn first_message_reads_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Madrid fell silent."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_message(response).unwrap(), "Madrid fell silent.");
    }

    #[test]
    fn empty_choices_is_upstream_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_message(response).unwrap_err().is_upstream());
    }

    #[test]
    fn first_url_reads_url() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{"created":1,"data":[{"url":"https://img.test/a.png"}]}"#)
                .unwrap();
        assert_eq!(first_url(response).unwrap(), "https://img.test/a.png");
    }

    #[test]
    fn missing_url_is_upstream_error() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"AAAA"}]}"#).unwrap();
        assert!(first_url(response).unwrap_err().is_upstream());
    }
}
