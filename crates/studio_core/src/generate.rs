//! Fan-out over an external content generator.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::GenerationConfig;
use crate::error::{BatchError, GenerationError};
use crate::listing::{GeneratedContent, Listing};

/// External service producing listing and product content for an idea
pub trait ContentGenerator: Send + Sync + 'static {
    fn listing(
        &self,
        idea: &str,
        credential: &str,
    ) -> impl Future<Output = Result<Listing, GenerationError>> + Send;

    fn product(
        &self,
        idea: &str,
        credential: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Pick the explicit credential if non-empty, otherwise read `env_var`.
pub fn resolve_credential(
    explicit: Option<&str>,
    env_var: &str,
) -> Result<String, GenerationError> {
    explicit
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|key| !key.is_empty()))
        .ok_or(GenerationError::MissingCredential)
}

/// One idea per non-empty line
pub fn ideas(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|idea| !idea.is_empty())
        .collect()
}

/// Generate content for every idea in `input`.
///
/// The credential is resolved once, before any request is made. Each idea
/// runs as its own task with listing and product requested together. Every
/// task is awaited even after one fails; any failure fails the whole batch.
/// Results keep input order.
pub async fn generate_batch<G: ContentGenerator>(
    generator: Arc<G>,
    input: &str,
    credential: Option<&str>,
    config: &GenerationConfig,
) -> Result<Vec<GeneratedContent>, BatchError> {
    let ideas = ideas(input);
    if ideas.is_empty() {
        return Err(BatchError::NoIdeas);
    }
    let credential = resolve_credential(credential, &config.credential_env).map_err(|e| {
        log::error!("{e}");
        BatchError::Credential(e)
    })?;
    log::info!("generating content for {} ideas", ideas.len());

    let credential = Arc::new(credential);
    let mut tasks = JoinSet::new();
    for (index, idea) in ideas.iter().enumerate() {
        let generator = Arc::clone(&generator);
        let credential = Arc::clone(&credential);
        let idea = idea.to_string();
        tasks.spawn(async move {
            let (listing, product) = tokio::join!(
                generator.listing(&idea, &credential),
                generator.product(&idea, &credential)
            );
            let outcome = listing.and_then(|listing| product.map(|product| (listing, product)));
            (index, idea, outcome)
        });
    }

    let mut slots: Vec<Option<GeneratedContent>> = (0..ideas.len()).map(|_| None).collect();
    let mut failure = None;

    while let Some(joined) = tasks.join_next().await {
        let error = match joined {
            Ok((index, idea, Ok((listing, product)))) => {
                listing.check();
                slots[index] = Some(GeneratedContent::new(idea, listing, product));
                continue;
            }
            Ok((_, idea, Err(source))) => {
                log::error!("generation failed for \"{idea}\": {source}");
                BatchError::Generation { idea, source }
            }
            Err(e) => {
                log::error!("generation task failed: {e}");
                BatchError::Task(e.to_string())
            }
        };
        if failure.is_none() {
            failure = Some(error);
        }
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(slots.into_iter().flatten().collect()),
    }
}
