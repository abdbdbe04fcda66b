//! Generation service client module
//!
//! Encapsulates the Bedrock knowledge-base `RetrieveAndGenerate` call and its
//! projection into the crate's domain model.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseRetrievalConfiguration, KnowledgeBaseRetrieveAndGenerateConfiguration,
    KnowledgeBaseVectorSearchConfiguration, RetrieveAndGenerateConfiguration,
    RetrieveAndGenerateInput, RetrieveAndGenerateType, SearchType,
};
use tracing::info;

use crate::core::config::{MODEL_ARN, QueryConfig, RETRIEVAL_RESULT_COUNT};
use crate::core::models::{CitationRecord, RetrievalReply};
use crate::errors::HandlerError;

/// Produces a grounded answer for a single question.
///
/// Handlers depend on this trait rather than on a concrete SDK client, so
/// tests can substitute a fake without process-wide state.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn retrieve_and_generate(&self, question: &str) -> Result<RetrievalReply, HandlerError>;
}

/// Bedrock knowledge-base implementation of [`GenerationService`].
pub struct BedrockGeneration {
    client: aws_sdk_bedrockagentruntime::Client,
    config: QueryConfig,
}

impl BedrockGeneration {
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig, config: QueryConfig) -> Self {
        Self {
            client: aws_sdk_bedrockagentruntime::Client::new(sdk_config),
            config,
        }
    }
}

#[async_trait]
impl GenerationService for BedrockGeneration {
    async fn retrieve_and_generate(&self, question: &str) -> Result<RetrievalReply, HandlerError> {
        info!(
            knowledge_base_id = %self.config.knowledge_base_id,
            "Sending retrieve-and-generate request"
        );

        let retrieval = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(
                KnowledgeBaseVectorSearchConfiguration::builder()
                    .number_of_results(RETRIEVAL_RESULT_COUNT)
                    .override_search_type(SearchType::Semantic)
                    .build(),
            )
            .build();

        let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
            .knowledge_base_id(&self.config.knowledge_base_id)
            .model_arn(MODEL_ARN)
            .retrieval_configuration(retrieval)
            .build()?;

        let response = self
            .client
            .retrieve_and_generate()
            .input(RetrieveAndGenerateInput::builder().text(question).build()?)
            .retrieve_and_generate_configuration(
                RetrieveAndGenerateConfiguration::builder()
                    .r#type(RetrieveAndGenerateType::KnowledgeBase)
                    .knowledge_base_configuration(knowledge_base)
                    .build()?,
            )
            .send()
            .await
            .map_err(|e| HandlerError::Generation(e.to_string()))?;

        let answer = response
            .output()
            .map(|output| output.text().to_string())
            .unwrap_or_default();

        let citations = response
            .citations()
            .iter()
            .map(|citation| {
                let reference = citation.retrieved_references().first();
                CitationRecord {
                    source: reference
                        .and_then(|r| r.location())
                        .and_then(|l| l.s3_location())
                        .and_then(|s3| s3.uri())
                        .map(ToString::to_string),
                    content: reference
                        .and_then(|r| r.content())
                        .map(|c| c.text())
                        .map(ToString::to_string),
                }
            })
            .collect();

        Ok(RetrievalReply {
            answer,
            session_id: response.session_id().to_string(),
            citations,
        })
    }
}
