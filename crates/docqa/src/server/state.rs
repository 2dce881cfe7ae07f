//! Application state for the document Q&A server

use std::sync::Arc;

use crate::analysis::{ImageAnalyzer, OcrEngine, TesseractOcr, VisionDescriber};
use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::DocumentExtractor;
use crate::processing::DocumentPipeline;
use crate::providers::{
    ChatProvider, EmbeddingProvider, OllamaEmbedder, OpenAiChatClient, OpenAiSpeechEngine,
    SpeechEngine,
};
use crate::retrieval::{Indexer, QueryEngine};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::speech::SpeechSynthesizer;

/// External collaborators the service is assembled from
pub struct Collaborators {
    pub sessions: Arc<dyn SessionStore>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Chat endpoint used for both answers and image descriptions
    pub chat: Arc<dyn ChatProvider>,
    pub speech: Arc<dyn SpeechEngine>,
    /// `None` disables OCR
    pub ocr: Option<Arc<dyn OcrEngine>>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    sessions: Arc<dyn SessionStore>,
    pipeline: DocumentPipeline,
    query_engine: QueryEngine,
    speech: SpeechSynthesizer,
}

impl AppState {
    /// Create application state with the HTTP clients and tools named in `config`
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing document Q&A state...");

        tokio::fs::create_dir_all(&config.storage.temp_root).await?;
        let sessions: Arc<dyn SessionStore> =
            Arc::new(InMemorySessionStore::new(config.storage.temp_root.clone()));
        tracing::info!("Session directories under {}", config.storage.temp_root.display());

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embeddings)?);
        match embedder.health_check().await {
            Ok(true) => tracing::info!(
                "Embedding provider {} ready (model: {})",
                embedder.name(),
                embedder.model()
            ),
            _ => tracing::warn!(
                "Embedding provider {} not reachable at {}; uploads will fail until it is",
                embedder.name(),
                config.embeddings.base_url
            ),
        }

        let chat: Arc<dyn ChatProvider> = Arc::new(OpenAiChatClient::new(&config.llm)?);
        tracing::info!("Chat model: {} via {}", config.llm.model, config.llm.base_url);

        let speech: Arc<dyn SpeechEngine> = Arc::new(OpenAiSpeechEngine::new(&config.tts)?);

        let ocr: Option<Arc<dyn OcrEngine>> = if config.ocr.enabled {
            Some(Arc::new(TesseractOcr::new(&config.ocr)))
        } else {
            tracing::info!("OCR disabled");
            None
        };

        Self::from_parts(
            config,
            Collaborators {
                sessions,
                embedder,
                chat,
                speech,
                ocr,
            },
        )
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(config: RagConfig, parts: Collaborators) -> Result<Self> {
        let vision = if config.vision.enabled {
            Some(VisionDescriber::new(Arc::clone(&parts.chat), config.vision.clone()))
        } else {
            tracing::info!("Vision descriptions disabled");
            None
        };

        let pipeline = DocumentPipeline::new(
            DocumentExtractor::new(&config.storage),
            ImageAnalyzer::new(parts.ocr, vision),
            Indexer::new(&config.chunking, Arc::clone(&parts.embedder))?,
        );
        let query_engine = QueryEngine::new(parts.embedder, parts.chat, config.llm.clone());
        let speech = SpeechSynthesizer::new(parts.speech, config.tts.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions: parts.sessions,
                pipeline,
                query_engine,
                speech,
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.inner.sessions.as_ref()
    }

    pub fn pipeline(&self) -> &DocumentPipeline {
        &self.inner.pipeline
    }

    pub fn query_engine(&self) -> &QueryEngine {
        &self.inner.query_engine
    }

    pub fn speech(&self) -> &SpeechSynthesizer {
        &self.inner.speech
    }
}
