use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{ClusterReport, ClusterSummary, DescriptionRecord, SummaryRequest};
use crate::prompts::user_cluster_summary;

/// Collect the raw descriptions backing one cluster into a summary request.
/// A cluster whose users have no records in the store yields a no-data
/// error, mirroring how a stale or mismatched store is surfaced upstream.
pub fn build_summary_request(
    cluster: &ClusterSummary,
    records: &[DescriptionRecord],
) -> Result<SummaryRequest> {
    let descriptions: Vec<String> = records
        .iter()
        .filter(|record| cluster.users.contains(&record.user))
        .map(|record| format!("User {}:\n{}", record.user, record.description))
        .collect();

    if descriptions.is_empty() {
        return Err(Error::NoData {
            scope: format!("cluster {}", cluster.cluster_id),
        });
    }

    Ok(SummaryRequest {
        cluster_users: cluster.users.clone(),
        descriptions,
    })
}

/// External text-generation boundary. The returned string is opaque prose;
/// nothing downstream parses it.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
pub struct ChatSummarizer {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatSummarizer {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Summary(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let start = Instant::now();
        let prompt = user_cluster_summary(&request.descriptions.join("\n\n"));

        debug!(
            "Summary call starting - users={}, prompt_length={} chars",
            request.cluster_users.len(),
            prompt.len()
        );

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Summary(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::Summary(format!("API error ({status}): {text}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Summary(format!("failed to parse response: {e}")))?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Summary("empty response from model".to_string()))?;

        info!(
            "Summary call completed - duration={:.2}s, response_length={} chars",
            start.elapsed().as_secs_f32(),
            answer.len()
        );

        Ok(answer)
    }
}

/// Request a summary for every non-empty cluster. Failures stay scoped to
/// their cluster: each comes back as an error string in that cluster's
/// report, and the cluster memberships themselves are untouched.
pub async fn summarize_clusters(
    summarizer: &dyn Summarizer,
    clusters: &[ClusterSummary],
    records: &[DescriptionRecord],
) -> Vec<ClusterReport> {
    let tasks = clusters
        .iter()
        .filter(|cluster| !cluster.users.is_empty())
        .map(|cluster| async move {
            let outcome = match build_summary_request(cluster, records) {
                Ok(request) => summarizer.summarize(&request).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(summary) => ClusterReport {
                    cluster_id: cluster.cluster_id,
                    summary: Some(summary),
                    error: None,
                },
                Err(e) => {
                    warn!("Summary failed for cluster {} - {}", cluster.cluster_id, e);
                    ClusterReport {
                        cluster_id: cluster.cluster_id,
                        summary: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        });

    join_all(tasks).await
}
