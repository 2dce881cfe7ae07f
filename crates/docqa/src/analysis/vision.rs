//! Image description with a hosted vision model

use base64::Engine as _;
use std::path::Path;
use std::sync::Arc;

use crate::config::VisionConfig;
use crate::error::Result;
use crate::providers::{ChatMessage, ChatProvider, ChatRequest};

/// Instruction sent with every image
pub const VISION_PROMPT: &str = "Describe this image. If it has charts, graphs, or tables, explain the data. If it has text, transcribe it.";

/// Describes images through an OpenAI-compatible chat endpoint
pub struct VisionDescriber {
    chat: Arc<dyn ChatProvider>,
    config: VisionConfig,
}

impl VisionDescriber {
    pub fn new(chat: Arc<dyn ChatProvider>, config: VisionConfig) -> Self {
        Self { chat, config }
    }

    /// Natural-language description of the image file
    pub async fn describe(&self, image: &Path) -> Result<String> {
        let data = tokio::fs::read(image).await?;
        let url = data_url(image, &data);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user_with_image(VISION_PROMPT, url)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let description = self.chat.complete(request).await?;
        Ok(description.trim().to_string())
    }
}

/// `data:<mime>;base64,<payload>` with the MIME type guessed from the extension
pub fn data_url(path: &Path, data: &[u8]) -> String {
    let mime = mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/jpeg");
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ContentPart;
    use crate::test_utils::ScriptedChat;

    #[test]
    fn test_data_url_mime() {
        assert_eq!(data_url(Path::new("a.png"), b"hi"), "data:image/png;base64,aGk=");
        assert!(data_url(Path::new("a.JPG"), b"hi").starts_with("data:image/jpeg;"));
        assert!(data_url(Path::new("noext"), b"hi").starts_with("data:image/jpeg;"));
    }

    #[tokio::test]
    async fn test_describe_sends_prompt_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"hi").unwrap();

        let chat = Arc::new(ScriptedChat::answering("  A bar chart of revenue.\n"));
        let describer = VisionDescriber::new(chat.clone(), VisionConfig::default());

        assert_eq!(describer.describe(&path).await.unwrap(), "A bar chart of revenue.");

        let request = chat.last_request().unwrap();
        assert_eq!(request.model, "llama-3.2-90b-vision-preview");
        assert_eq!(
            request.messages[0].content,
            vec![
                ContentPart::Text(VISION_PROMPT.to_string()),
                ContentPart::ImageUrl("data:image/png;base64,aGk=".to_string()),
            ]
        );
    }
}
