//! The two request paths: text prompt to text, and image plus instruction to
//! text. Both build a fresh model client for the resolved key, send exactly
//! one request and hand back the provider's text untouched.

use crate::credentials::ApiKey;
use crate::gemini::{ModelProvider, Part, ProviderError};
use crate::upload::UploadedImage;

pub async fn text_request(
    provider: &dyn ModelProvider,
    key: &ApiKey,
    prompt: &str,
) -> Result<String, ProviderError> {
    tracing::info!(
        model = provider.model_name(),
        prompt_chars = prompt.chars().count(),
        "Sending text prompt"
    );

    let model = provider.model(key);
    model.generate_content(vec![Part::Text(prompt.to_string())]).await
}

pub async fn image_request(
    provider: &dyn ModelProvider,
    key: &ApiKey,
    image: &UploadedImage,
    prompt: &str,
) -> Result<String, ProviderError> {
    let (width, height) = image.dimensions();
    tracing::info!(
        model = provider.model_name(),
        prompt_chars = prompt.chars().count(),
        mime_type = image.mime_type(),
        bytes = image.bytes().len(),
        width,
        height,
        "Sending image analysis request"
    );

    let model = provider.model(key);
    model
        .generate_content(vec![
            Part::Text(prompt.to_string()),
            Part::Image {
                mime_type: image.mime_type().to_string(),
                data: image.bytes().to_vec(),
            },
        ])
        .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gemini::GenerativeModel;
    use async_trait::async_trait;
    use image::ImageOutputFormat;
    use std::sync::{Arc, Mutex};

    /// Records every request instead of calling out.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingProvider {
        pub calls: Arc<Mutex<Vec<(String, Vec<Part>)>>>,
        pub fail_with: Option<String>,
    }

    impl RecordingProvider {
        pub fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    struct RecordingModel {
        key: String,
        provider: RecordingProvider,
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ProviderError> {
            let reply = match parts.first() {
                Some(Part::Text(text)) => format!("echo: {}", text),
                _ => "echo".to_string(),
            };
            self.provider
                .calls
                .lock()
                .unwrap()
                .push((self.key.clone(), parts));
            match &self.provider.fail_with {
                Some(message) => Err(ProviderError::Api {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(reply),
            }
        }
    }

    impl ModelProvider for RecordingProvider {
        fn model_name(&self) -> &str {
            "recording-model"
        }

        fn model(&self, key: &ApiKey) -> Box<dyn GenerativeModel> {
            Box::new(RecordingModel {
                key: key.expose().to_string(),
                provider: self.clone(),
            })
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("k-123").unwrap()
    }

    #[tokio::test]
    async fn text_prompt_is_sent_once_and_unchanged() {
        let provider = RecordingProvider::default();
        let prompt = "  Write a haiku about *rust*\n";

        let text = text_request(&provider, &key(), prompt).await.unwrap();
        assert_eq!(text, format!("echo: {}", prompt));

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "k-123");
        assert_eq!(calls[0].1, vec![Part::Text(prompt.to_string())]);
    }

    #[tokio::test]
    async fn image_request_sends_instruction_then_image() {
        let provider = RecordingProvider::default();
        let bytes = crate::upload::tests::sample(ImageOutputFormat::Png);
        let image = UploadedImage::decode(bytes.clone()).unwrap();

        image_request(&provider, &key(), &image, "What is this?")
            .await
            .unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            vec![
                Part::Text("What is this?".to_string()),
                Part::Image {
                    mime_type: "image/png".to_string(),
                    data: bytes,
                },
            ]
        );
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = RecordingProvider::failing("quota exceeded");
        let err = text_request(&provider, &key(), "hi").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(provider.call_count(), 1);
    }
}
