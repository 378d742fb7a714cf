//! Multi-angle orchestration for try-on generation
//!
//! Drives the single-view generator across all required angles in a fixed
//! order, applies inter-request pacing, collects partial results, and
//! selects a primary image for callers that only want one.

use crate::generator::{GenerationRequest, SingleViewGenerator};
use crate::pacer::{Pacer, TokioPacer};
use crate::result::{GenerationResult, MultiAngleResult};
use fitcheck_config::Config;
use fitcheck_prompt::PromptSet;
use fitcheck_provider::ImageGenProvider;
use fitcheck_utils::{Angle, GenerationError, ImagePayload};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Progress of one orchestration run, surfaced through tracing.
///
/// ```text
/// Pending → Generating(front) → Generating(back) → Generating(side)
///         → Aggregating → Complete | Failed
/// ```
///
/// Transitions are enforced structurally by the sequential control flow in
/// [`MultiAngleOrchestrator::generate_all`]; Aggregating is entered only
/// after all three attempts have resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Pending,
    Generating(Angle),
    Aggregating,
    Complete,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Generating(angle) => write!(f, "generating {angle}"),
            Self::Aggregating => f.write_str("aggregating"),
            Self::Complete => f.write_str("complete"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Sequences single-view generation across front, back, and side.
///
/// The three angle generations are strictly sequential by design: the
/// pacing delay between calls is what keeps the provider's rate limiter
/// quiet, and parallel calls would defeat it. Each run owns its inputs and
/// result map exclusively, so independent runs can execute concurrently
/// without shared state.
///
/// The orchestrator introduces no randomness; any run-to-run variation
/// comes entirely from the provider. Dropping the `generate_all` future
/// between calls abandons the remaining attempts.
pub struct MultiAngleOrchestrator {
    generator: SingleViewGenerator,
    pacer: Arc<dyn Pacer>,
    pacing_delay: Duration,
}

impl MultiAngleOrchestrator {
    /// Create an orchestrator with the production tokio pacer.
    #[must_use]
    pub fn new(generator: SingleViewGenerator, pacing_delay: Duration) -> Self {
        Self::with_pacer(generator, pacing_delay, Arc::new(TokioPacer))
    }

    /// Create an orchestrator with an explicit pacer. Tests inject a
    /// recording pacer here to observe pacing without real timers.
    #[must_use]
    pub fn with_pacer(
        generator: SingleViewGenerator,
        pacing_delay: Duration,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            generator,
            pacer,
            pacing_delay,
        }
    }

    /// Wire an orchestrator from configuration: per-call timeout and
    /// pacing delay come from the config, everything else from the
    /// supplied collaborators.
    #[must_use]
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn ImageGenProvider>,
        prompts: PromptSet,
    ) -> Self {
        let generator = SingleViewGenerator::new(provider, prompts, config.timeout());
        Self::new(generator, config.pacing_delay())
    }

    /// Generate all three views for a person/garment pair.
    ///
    /// Angles are attempted in the fixed order front → back → side with a
    /// pacing pause between successive provider calls. A failed angle is
    /// recorded in the result and the run continues; callers always get
    /// whatever subset succeeded.
    ///
    /// The front view is the designated primary. If it failed on the
    /// first pass, exactly one fallback front generation is attempted
    /// (after a pacing pause); the fallback budget is the same whether
    /// the other angles succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::PrimaryGenerationFailed`] only when the
    /// fallback front generation also fails, i.e. the run produced no
    /// usable primary image. No other error escapes this method.
    pub async fn generate_all(
        &self,
        person: &ImagePayload,
        garment: &ImagePayload,
    ) -> Result<MultiAngleResult, GenerationError> {
        debug!(state = %RunState::Pending, pacing_ms = self.pacing_delay.as_millis() as u64, "orchestration run starting");

        let front = self.attempt(person, garment, Angle::Front).await;
        self.pacer.pause(self.pacing_delay).await;
        let back = self.attempt(person, garment, Angle::Back).await;
        self.pacer.pause(self.pacing_delay).await;
        let side = self.attempt(person, garment, Angle::Side).await;

        debug!(state = %RunState::Aggregating, "all angle attempts resolved");

        let (front, primary) = match front {
            GenerationResult::Generated(image) => {
                let primary = image.clone();
                (GenerationResult::Generated(image), primary)
            }
            GenerationResult::Failed(first_error) => {
                self.fallback_front(person, garment, &first_error).await?
            }
        };

        let result = MultiAngleResult::new(front, back, side, primary);
        debug!(
            state = %RunState::Complete,
            succeeded = ?result.succeeded_angles(),
            "orchestration run complete"
        );
        Ok(result)
    }

    /// One single-view attempt with its failure absorbed into the result
    /// slot. A recorded failure is final for this run.
    async fn attempt(
        &self,
        person: &ImagePayload,
        garment: &ImagePayload,
        angle: Angle,
    ) -> GenerationResult {
        debug!(state = %RunState::Generating(angle), "orchestration state");

        let request = GenerationRequest::new(person.clone(), garment.clone(), angle);
        match self.generator.generate(&request).await {
            Ok(image) => GenerationResult::Generated(image),
            Err(error) => {
                warn!(angle = %angle, error = %error, "view generation failed");
                GenerationResult::Failed(error)
            }
        }
    }

    /// The single fallback front generation. Shared budget for both the
    /// front-only-failed and everything-failed paths: at most one extra
    /// provider call per run, preceded by a normal pacing pause.
    async fn fallback_front(
        &self,
        person: &ImagePayload,
        garment: &ImagePayload,
        first_error: &GenerationError,
    ) -> Result<(GenerationResult, ImagePayload), GenerationError> {
        warn!(error = %first_error, "front view missing, attempting fallback generation");
        self.pacer.pause(self.pacing_delay).await;

        let request = GenerationRequest::new(person.clone(), garment.clone(), Angle::Front);
        match self.generator.generate(&request).await {
            Ok(image) => {
                debug!(bytes = image.len(), "fallback front generation succeeded");
                let primary = image.clone();
                Ok((GenerationResult::Generated(image), primary))
            }
            Err(fallback_error) => {
                warn!(
                    state = %RunState::Failed,
                    error = %fallback_error,
                    "fallback front generation failed, run has no usable primary"
                );
                Err(GenerationError::PrimaryGenerationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacer::RecordingPacer;
    use fitcheck_provider::mock::MockProvider;
    use fitcheck_utils::{MediaType, ProviderError};

    const DELAY: Duration = Duration::from_millis(1000);

    fn jpeg(byte: u8) -> ImagePayload {
        ImagePayload::new(vec![byte], MediaType::Jpeg)
    }

    fn orchestrator(
        mock: &Arc<MockProvider>,
        pacer: &Arc<RecordingPacer>,
    ) -> MultiAngleOrchestrator {
        let generator = SingleViewGenerator::new(
            Arc::clone(mock) as Arc<dyn ImageGenProvider>,
            PromptSet::default(),
            Duration::from_secs(30),
        );
        MultiAngleOrchestrator::with_pacer(
            generator,
            DELAY,
            Arc::clone(pacer) as Arc<dyn Pacer>,
        )
    }

    #[tokio::test]
    async fn test_all_angles_succeed() {
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[1]); // front
        mock.push_image(&[2]); // back
        mock.push_image(&[3]); // side
        let pacer = Arc::new(RecordingPacer::new());

        let result = orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        assert_eq!(
            result.succeeded_angles(),
            vec![Angle::Front, Angle::Back, Angle::Side]
        );
        assert_eq!(result.primary().data, vec![1]);
        assert_eq!(result.image(Angle::Back).unwrap().data, vec![2]);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_angles_attempted_in_fixed_order() {
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[1]);
        mock.push_image(&[2]);
        mock.push_image(&[3]);
        let pacer = Arc::new(RecordingPacer::new());

        orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        let prompts = PromptSet::default();
        let sent: Vec<String> = mock.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(
            sent,
            vec![
                prompts.for_angle(Angle::Front).to_string(),
                prompts.for_angle(Angle::Back).to_string(),
                prompts.for_angle(Angle::Side).to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_back_failure_is_isolated() {
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[1]); // front
        mock.push_error(ProviderError::ProviderOutage("HTTP 502".to_string())); // back
        mock.push_image(&[3]); // side
        let pacer = Arc::new(RecordingPacer::new());

        let result = orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        assert_eq!(result.succeeded_angles(), vec![Angle::Front, Angle::Side]);
        assert!(result.image(Angle::Back).is_none());
        assert!(result.failure(Angle::Back).is_some());
        assert_eq!(result.primary().data, vec![1]);
        // No fallback needed: exactly the three planned calls
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_front_failure_recovered_by_fallback() {
        let mock = Arc::new(MockProvider::new());
        mock.push_text_only("declined"); // front: NoImageProduced
        mock.push_image(&[2]); // back
        mock.push_image(&[3]); // side
        mock.push_image(&[9]); // fallback front
        let pacer = Arc::new(RecordingPacer::new());

        let result = orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        // The fallback image becomes both the primary and the front slot
        assert_eq!(result.primary().data, vec![9]);
        assert_eq!(result.image(Angle::Front).unwrap().data, vec![9]);
        assert_eq!(
            result.succeeded_angles(),
            vec![Angle::Front, Angle::Back, Angle::Side]
        );
        assert_eq!(mock.call_count(), 4);

        // Fallback call asked for the front view
        let prompts = PromptSet::default();
        assert_eq!(mock.requests()[3].prompt, prompts.for_angle(Angle::Front));
    }

    #[tokio::test]
    async fn test_total_failure_raises_primary_generation_failed() {
        let mock = Arc::new(MockProvider::new());
        for _ in 0..3 {
            mock.push_error(ProviderError::Transport("connection refused".to_string()));
        }
        mock.push_error(ProviderError::Transport("connection refused".to_string())); // fallback
        let pacer = Arc::new(RecordingPacer::new());

        let err = orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::PrimaryGenerationFailed));
        // One fallback attempt, never more: four calls total
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_front_and_fallback_failure_discards_partial_success() {
        // Front fails twice; back and side succeeded, but without a
        // primary the whole run fails
        let mock = Arc::new(MockProvider::new());
        mock.push_text_only("declined"); // front
        mock.push_image(&[2]); // back
        mock.push_image(&[3]); // side
        mock.push_text_only("declined again"); // fallback front
        let pacer = Arc::new(RecordingPacer::new());

        let err = orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::PrimaryGenerationFailed));
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_pacing_between_successive_calls() {
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[1]);
        mock.push_image(&[2]);
        mock.push_image(&[3]);
        let pacer = Arc::new(RecordingPacer::new());

        orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        // Three calls, two inter-call pauses of the configured duration
        assert_eq!(pacer.pauses(), vec![DELAY, DELAY]);
    }

    #[tokio::test]
    async fn test_fallback_call_is_paced_too() {
        let mock = Arc::new(MockProvider::new());
        mock.push_text_only("declined"); // front
        mock.push_image(&[2]); // back
        mock.push_image(&[3]); // side
        mock.push_image(&[9]); // fallback
        let pacer = Arc::new(RecordingPacer::new());

        orchestrator(&mock, &pacer)
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();

        // Two inter-angle pauses plus one before the fallback call
        assert_eq!(pacer.pauses(), vec![DELAY, DELAY, DELAY]);
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_pacing() {
        let mut config = Config::minimal_for_testing();
        config.pacing.delay_ms = Some(250);

        let mock = Arc::new(MockProvider::new());
        let orchestrator = MultiAngleOrchestrator::from_config(
            &config,
            Arc::clone(&mock) as Arc<dyn ImageGenProvider>,
            PromptSet::default(),
        );

        assert_eq!(orchestrator.pacing_delay, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_independent_runs_share_no_state() {
        let mock = Arc::new(MockProvider::new());
        for byte in 1..=6 {
            mock.push_image(&[byte]);
        }
        let pacer = Arc::new(RecordingPacer::new());
        let orchestrator = orchestrator(&mock, &pacer);

        let first = orchestrator
            .generate_all(&jpeg(100), &jpeg(101))
            .await
            .unwrap();
        let second = orchestrator
            .generate_all(&jpeg(200), &jpeg(201))
            .await
            .unwrap();

        assert_eq!(first.primary().data, vec![1]);
        assert_eq!(second.primary().data, vec![4]);
    }
}
