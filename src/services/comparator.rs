//! Comparison orchestrator
//!
//! Sends one question to several models, one model at a time, and collects an
//! ordered outcome per model. A failing model never aborts the batch.

use crate::config::ComparisonConfig;
use crate::models::comparison::{ComparisonResult, ModelSelection};
use crate::services::client::ModelQuery;
use crate::utils::error::{AppError, AppResult, ErrorContext, QueryError};
use crate::utils::logging::{truncate_for_log, LOG_EXCERPT_CHARS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One queued model query
#[derive(Debug)]
struct Job {
    position: usize,
    model: String,
}

/// Sequential, throttled fan-out over a [`ModelQuery`]
#[derive(Clone)]
pub struct Comparator {
    client: Arc<dyn ModelQuery>,
    config: ComparisonConfig,
}

impl Comparator {
    pub fn new(client: Arc<dyn ModelQuery>, config: ComparisonConfig) -> Self {
        Self { client, config }
    }

    pub fn max_models(&self) -> usize {
        self.config.max_models
    }

    pub fn request_delay(&self) -> Duration {
        self.config.request_delay()
    }

    /// Query every model in order and return one result per model
    pub async fn compare(&self, question: &str, models: &[String]) -> AppResult<Vec<ComparisonResult>> {
        self.compare_with_cancel(question, models, CancellationToken::new())
            .await
    }

    /// Like [`Comparator::compare`], stopping early when `cancel` fires
    ///
    /// Models not yet finished when the token is cancelled are reported as
    /// timed out. The result still holds one entry per model, in input order.
    pub async fn compare_with_cancel(
        &self,
        question: &str,
        models: &[String],
        cancel: CancellationToken,
    ) -> AppResult<Vec<ComparisonResult>> {
        if question.trim().is_empty() {
            return Err(AppError::Validation("Question cannot be empty".to_string()));
        }
        if models.is_empty() {
            return Err(AppError::Validation(
                "At least one model must be selected".to_string(),
            ));
        }
        let selection = ModelSelection::from_models(models.iter().cloned(), self.config.max_models)?;
        let total = selection.len();

        info!(
            "Starting comparison across {} models: {}",
            total,
            truncate_for_log(question, LOG_EXCERPT_CHARS)
        );

        // The queue holds exactly one job per model before the worker starts
        let (job_tx, job_rx) = mpsc::channel(total);
        for (position, model) in selection.into_models().into_iter().enumerate() {
            job_tx
                .try_send(Job { position, model })
                .internal_context("Failed to queue comparison job")?;
        }
        drop(job_tx);

        let (done_tx, done_rx) = oneshot::channel();
        let worker = Worker {
            client: Arc::clone(&self.client),
            question: question.to_string(),
            delay: self.config.request_delay(),
            cancel,
            total,
        };
        tokio::spawn(worker.run(job_rx, done_tx));

        let results = done_rx
            .await
            .internal_context("Comparison worker stopped before finishing")?;

        let failures = results.iter().filter(|r| !r.is_success()).count();
        info!(
            "Comparison finished: {} succeeded, {} failed",
            results.len() - failures,
            failures
        );

        Ok(results)
    }
}

struct Worker {
    client: Arc<dyn ModelQuery>,
    question: String,
    delay: Duration,
    cancel: CancellationToken,
    total: usize,
}

impl Worker {
    async fn run(
        self,
        jobs: mpsc::Receiver<Job>,
        done: oneshot::Sender<Vec<ComparisonResult>>,
    ) {
        let mut jobs = ReceiverStream::new(jobs);
        let mut results = Vec::with_capacity(self.total);
        let mut next_dispatch: Option<Instant> = None;

        while let Some(job) = jobs.next().await {
            if let Some(at) = next_dispatch {
                tokio::select! {
                    _ = sleep_until(at) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }

            if self.cancel.is_cancelled() {
                warn!("Comparison cancelled, skipping {}", job.model);
                results.push(ComparisonResult::failure(
                    &job.model,
                    QueryError::Timeout.user_message(&job.model),
                ));
                continue;
            }

            debug!(
                "Dispatching model {} ({}/{})",
                job.model,
                job.position + 1,
                self.total
            );

            let outcome = tokio::select! {
                biased;
                outcome = self.client.query_model(&job.model, &self.question) => outcome,
                _ = self.cancel.cancelled() => Err(QueryError::Timeout),
            };

            results.push(match outcome {
                Ok(response) => ComparisonResult::success(&job.model, response),
                Err(err) => {
                    warn!("Model {} failed: {} ({})", job.model, err, err.kind());
                    ComparisonResult::failure(&job.model, err.user_message(&job.model))
                }
            });

            next_dispatch = Instant::now().checked_add(self.delay);
        }

        if done.send(results).is_err() {
            debug!("Comparison caller went away before results were ready");
        }
    }
}
