//! Deterministic fake providers for engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use sagealpha_core::document::{DocumentMeta, RetrievedDocument};
use sagealpha_core::error::ProviderError;
use sagealpha_core::message::Message;
use sagealpha_core::provider::{GenerationOptions, GenerationProvider, SearchProvider};

/// Build a retrieved document with just an id, text, and score.
pub fn scored_doc(id: &str, text: &str, score: f32) -> RetrievedDocument {
    RetrievedDocument {
        doc_id: id.to_string(),
        text: text.to_string(),
        meta: DocumentMeta::default(),
        score,
    }
}

/// Returns a fixed document list for every query, recording the calls
/// it receives.
pub struct FakeSearchProvider {
    docs: Vec<RetrievedDocument>,
    requests: Mutex<Vec<(String, usize)>>,
}

impl FakeSearchProvider {
    pub fn with_docs(docs: Vec<RetrievedDocument>) -> Self {
        Self {
            docs,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_top_k(&self) -> Option<usize> {
        self.requests.lock().unwrap().last().map(|(_, k)| *k)
    }
}

#[async_trait]
impl SearchProvider for FakeSearchProvider {
    fn name(&self) -> &str {
        "fake_search"
    }

    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), top_k));
        Ok(self.docs.clone())
    }
}

/// Always fails, standing in for an unreachable index.
pub struct FailingSearchProvider;

#[async_trait]
impl SearchProvider for FailingSearchProvider {
    fn name(&self) -> &str {
        "failing_search"
    }

    async fn search(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// Returns scripted answers in order, recording every prompt it sees.
/// Repeats the last answer once the script runs out.
pub struct FakeGenerationProvider {
    answers: Vec<String>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl FakeGenerationProvider {
    pub fn answering(answer: &str) -> Self {
        Self::with_answers(vec![answer.to_string()])
    }

    pub fn with_answers(answers: Vec<String>) -> Self {
        Self {
            answers,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Every message sequence passed to `complete`, in call order.
    pub fn seen_prompts(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for FakeGenerationProvider {
    fn name(&self) -> &str {
        "fake_generation"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let mut seen = self.seen.lock().unwrap();
        let index = seen.len().min(self.answers.len() - 1);
        seen.push(messages.to_vec());
        Ok(self.answers[index].clone())
    }
}

/// Always fails, standing in for a broken completion deployment.
pub struct FailingGenerationProvider;

#[async_trait]
impl GenerationProvider for FailingGenerationProvider {
    fn name(&self) -> &str {
        "failing_generation"
    }

    async fn complete(
        &self,
        _messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::ApiError {
            status_code: 500,
            message: "internal error".to_string(),
        })
    }
}
