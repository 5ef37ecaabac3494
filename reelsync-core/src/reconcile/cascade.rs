use std::{fmt, sync::Arc};

use reelsync_model::{ContentRecord, ImageField};
use tracing::debug;

use crate::{
    error::ProviderError,
    ports::{ArtworkSet, ImageProvider},
    report::{Incident, Reporter},
};

/// Position of a step in the cascade. Only changes how refusals are
/// reported: a rate-limited or rejected fallback is treated like not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    Primary,
    Fallback,
    Secondary,
}

#[derive(Clone)]
pub struct CascadeStep {
    provider: Arc<dyn ImageProvider>,
    role: StepRole,
}

impl fmt::Debug for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeStep")
            .field("provider", &self.provider.name())
            .field("role", &self.role)
            .finish()
    }
}

impl CascadeStep {
    pub fn new(provider: Arc<dyn ImageProvider>, role: StepRole) -> Self {
        Self { provider, role }
    }

    pub fn primary(provider: Arc<dyn ImageProvider>) -> Self {
        Self::new(provider, StepRole::Primary)
    }

    pub fn fallback(provider: Arc<dyn ImageProvider>) -> Self {
        Self::new(provider, StepRole::Fallback)
    }

    pub fn secondary(provider: Arc<dyn ImageProvider>) -> Self {
        Self::new(provider, StepRole::Secondary)
    }

    pub fn role(&self) -> StepRole {
        self.role
    }
}

/// What one step did to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Slots this step resolved, in slot order.
    Filled(Vec<ImageField>),
    /// The provider answered but had nothing for the missing slots.
    NothingUsable,
    MissingIdentifier(&'static str),
    NotFound,
    /// Rate-limited or rejected key on a fallback step.
    Refused(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub provider: &'static str,
    pub role: StepRole,
    pub outcome: StepOutcome,
}

/// Ordered artwork fallback. Earlier steps take precedence: a slot resolved
/// by one step is never touched by a later one.
#[derive(Clone)]
pub struct ImageResolutionCascade {
    steps: Vec<CascadeStep>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for ImageResolutionCascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResolutionCascade")
            .field("steps", &self.steps)
            .finish()
    }
}

impl ImageResolutionCascade {
    pub fn new(steps: Vec<CascadeStep>, reporter: Arc<dyn Reporter>) -> Self {
        Self { steps, reporter }
    }

    pub fn steps(&self) -> &[CascadeStep] {
        &self.steps
    }

    /// Fill the placeholder slots of `record`. Never fails; steps that did
    /// not run because every slot was already resolved are absent from the
    /// returned reports.
    pub async fn resolve(&self, record: &mut ContentRecord) -> Vec<StepReport> {
        let kind = record.media_kind();
        let mut reports = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            if record.images.is_complete() {
                break;
            }

            let provider = step.provider.name();
            let ids = record.cross_ids();
            let result = step.provider.images(kind, &ids).await;

            let outcome = match result {
                Ok(artwork) => fill_missing(record, &artwork),
                Err(err) => self.classify(step, record, err),
            };

            debug!(
                id = %record.id,
                provider,
                outcome = ?outcome,
                "image step done"
            );
            reports.push(StepReport {
                provider,
                role: step.role,
                outcome,
            });
        }

        reports
    }

    fn classify(
        &self,
        step: &CascadeStep,
        record: &ContentRecord,
        err: ProviderError,
    ) -> StepOutcome {
        let provider = step.provider.name();
        let id = record.id.clone();

        match err {
            ProviderError::MissingIdentifier(identifier) => {
                self.reporter.report(&Incident::ImageIdentifierMissing {
                    provider,
                    id,
                    identifier,
                });
                StepOutcome::MissingIdentifier(identifier)
            }
            ProviderError::NotFound => {
                self.reporter
                    .report(&Incident::ImageNotFound { provider, id });
                StepOutcome::NotFound
            }
            err if err.is_refusal() && step.role == StepRole::Fallback => {
                let error = err.to_string();
                self.reporter.report(&Incident::ImageProviderRefused {
                    provider,
                    id,
                    error: error.clone(),
                });
                StepOutcome::Refused(error)
            }
            err => {
                let error = err.to_string();
                self.reporter.report(&Incident::ImageProviderFailed {
                    provider,
                    id,
                    error: error.clone(),
                });
                StepOutcome::Failed(error)
            }
        }
    }
}

fn fill_missing(
    record: &mut ContentRecord,
    artwork: &ArtworkSet,
) -> StepOutcome {
    let missing: Vec<ImageField> = record.images.missing().collect();
    let filled: Vec<ImageField> = missing
        .into_iter()
        .filter(|field| {
            artwork
                .get(*field)
                .is_some_and(|set| record.images.fill(*field, set.clone()))
        })
        .collect();

    if filled.is_empty() {
        StepOutcome::NothingUsable
    } else {
        StepOutcome::Filled(filled)
    }
}
