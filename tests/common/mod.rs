#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fxhash::hash64;
use pricematch::{EmbeddingClient, Matcher, MatcherConfig, Normalizer, Pipeline, ProviderError};
use semantic::{EmbedRequest, EmbeddingProvider, EmbeddingRole, EmbeddingVector};

pub const DIM: usize = 256;

/// Offline provider: bag-of-words vectors hashed into `DIM` buckets, so
/// texts sharing words score higher. Records every call.
#[derive(Default)]
pub struct ScriptedProvider {
    pub calls: Mutex<Vec<Call>>,
    /// Fail the n-th call (0-based) made to this provider.
    pub fail_on_call: Option<usize>,
    /// Texts that come back as all-zero vectors.
    pub zero_texts: Vec<String>,
    /// Return one vector too few for every batch.
    pub drop_last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub role: EmbeddingRole,
    pub batch_index: usize,
    pub texts: Vec<String>,
}

impl ScriptedProvider {
    pub fn roles(&self) -> Vec<EmbeddingRole> {
        self.calls.lock().unwrap().iter().map(|c| c.role).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn bag_of_words(text: &str, dim: usize) -> EmbeddingVector {
    let mut v = vec![0.0; dim];
    for word in text.split_whitespace() {
        v[(hash64(word.as_bytes()) % dim as u64) as usize] += 1.0;
    }
    v
}

#[async_trait]
impl EmbeddingProvider for ScriptedProvider {
    async fn embed_batch(
        &self,
        request: EmbedRequest<'_>,
    ) -> Result<Vec<EmbeddingVector>, ProviderError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                role: request.role,
                batch_index: request.batch_index,
                texts: request.texts.to_vec(),
            });
            calls.len() - 1
        };
        if self.fail_on_call == Some(call_index) {
            return Err(ProviderError::transient("HTTP error 503 Service Unavailable"));
        }

        let mut out: Vec<EmbeddingVector> = request
            .texts
            .iter()
            .map(|text| {
                if self.zero_texts.iter().any(|z| z == text) {
                    vec![0.0; request.dimension]
                } else {
                    bag_of_words(text, request.dimension)
                }
            })
            .collect();
        if self.drop_last {
            out.pop();
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn pipeline_with(provider: Arc<ScriptedProvider>, batch: usize, top_k: usize) -> Pipeline {
    let client = EmbeddingClient::new(provider, batch, DIM).expect("valid client");
    let matcher = Matcher::new(MatcherConfig { top_k }).expect("valid matcher");
    Pipeline::new(Normalizer::default(), client, matcher)
}
