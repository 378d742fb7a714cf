//! Single-view generation: one provider attempt for one viewing angle.

use fitcheck_prompt::PromptSet;
use fitcheck_provider::{ImageGenProvider, ProviderRequest, ResponsePart};
use fitcheck_utils::{Angle, GenerationError, ImagePayload};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Input to one view generation: the person/garment pair plus the target
/// angle. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    person: ImagePayload,
    garment: ImagePayload,
    angle: Angle,
}

impl GenerationRequest {
    /// Bundle the inputs for one view generation.
    #[must_use]
    pub fn new(person: ImagePayload, garment: ImagePayload, angle: Angle) -> Self {
        Self {
            person,
            garment,
            angle,
        }
    }

    /// The person photo.
    #[must_use]
    pub fn person(&self) -> &ImagePayload {
        &self.person
    }

    /// The garment photo.
    #[must_use]
    pub fn garment(&self) -> &ImagePayload {
        &self.garment
    }

    /// The requested viewing angle.
    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }
}

/// Issues exactly one provider request for a specific viewing angle.
///
/// This is a pure single-attempt primitive: no retry, no pacing, no
/// fallback. That policy belongs to the orchestrator, which keeps this
/// component independently testable against a mocked provider. The
/// generator holds no mutable state, so identical provider behavior
/// yields identical outcomes across calls.
pub struct SingleViewGenerator {
    provider: Arc<dyn ImageGenProvider>,
    prompts: PromptSet,
    timeout: Duration,
}

impl SingleViewGenerator {
    /// Create a generator over a provider with the given prompt table and
    /// per-call timeout.
    #[must_use]
    pub fn new(provider: Arc<dyn ImageGenProvider>, prompts: PromptSet, timeout: Duration) -> Self {
        Self {
            provider,
            prompts,
            timeout,
        }
    }

    /// The prompt table in use.
    #[must_use]
    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Generate one try-on view.
    ///
    /// Scans the provider's response parts in order and returns the first
    /// image part.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::NoImageProduced`] if the provider answered but
    ///   emitted no image part (it declined or failed to synthesize)
    /// - [`GenerationError::Failed`] wrapping any transport or
    ///   provider-side error, cause preserved
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ImagePayload, GenerationError> {
        let prompt = self.prompts.for_angle(request.angle());

        debug!(
            angle = %request.angle(),
            timeout_secs = self.timeout.as_secs(),
            "requesting try-on view"
        );

        let provider_request = ProviderRequest::new(
            request.person().clone(),
            request.garment().clone(),
            prompt,
            self.timeout,
        );

        let response = self.provider.generate(provider_request).await?;

        // First image part wins; anything else the model said is ignored.
        for part in response.parts {
            if let ResponsePart::Image(image) = part {
                debug!(angle = %request.angle(), bytes = image.len(), "view generated");
                return Ok(image);
            }
        }

        Err(GenerationError::NoImageProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitcheck_provider::mock::MockProvider;
    use fitcheck_utils::{MediaType, ProviderError};

    fn jpeg(byte: u8) -> ImagePayload {
        ImagePayload::new(vec![byte], MediaType::Jpeg)
    }

    fn generator(mock: Arc<MockProvider>) -> SingleViewGenerator {
        SingleViewGenerator::new(mock, PromptSet::default(), Duration::from_secs(30))
    }

    fn request(angle: Angle) -> GenerationRequest {
        GenerationRequest::new(jpeg(1), jpeg(2), angle)
    }

    #[tokio::test]
    async fn test_generate_returns_first_image_part() {
        let mock = Arc::new(MockProvider::new());
        mock.push_response(vec![
            ResponsePart::Text("sure, here you go".to_string()),
            ResponsePart::Image(jpeg(10)),
            ResponsePart::Image(jpeg(20)),
        ]);

        let image = generator(Arc::clone(&mock))
            .generate(&request(Angle::Front))
            .await
            .unwrap();

        assert_eq!(image.data, vec![10]);
    }

    #[tokio::test]
    async fn test_generate_sends_angle_specific_prompt() {
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[1]);

        generator(Arc::clone(&mock))
            .generate(&request(Angle::Back))
            .await
            .unwrap();

        let prompts = PromptSet::default();
        assert_eq!(mock.requests()[0].prompt, prompts.for_angle(Angle::Back));
    }

    #[tokio::test]
    async fn test_text_only_response_is_no_image_produced() {
        let mock = Arc::new(MockProvider::new());
        mock.push_text_only("I cannot generate that image");

        let err = generator(Arc::clone(&mock))
            .generate(&request(Angle::Side))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::NoImageProduced));
    }

    #[tokio::test]
    async fn test_empty_response_is_no_image_produced() {
        let mock = Arc::new(MockProvider::new());
        mock.push_response(vec![]);

        let err = generator(Arc::clone(&mock))
            .generate(&request(Angle::Front))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::NoImageProduced));
    }

    #[tokio::test]
    async fn test_provider_error_wrapped_with_cause() {
        let mock = Arc::new(MockProvider::new());
        mock.push_error(ProviderError::ProviderOutage("HTTP 503".to_string()));

        let err = generator(Arc::clone(&mock))
            .generate(&request(Angle::Front))
            .await
            .unwrap_err();

        match err {
            GenerationError::Failed(ProviderError::ProviderOutage(msg)) => {
                assert!(msg.contains("503"));
            }
            other => panic!("Expected Failed(ProviderOutage), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generator_is_idempotent_across_calls() {
        // Identical scripted behavior on both calls yields identical
        // outcomes; the generator keeps no hidden state between them.
        let mock = Arc::new(MockProvider::new());
        mock.push_image(&[42]);
        mock.push_image(&[42]);

        let generator = generator(Arc::clone(&mock));
        let first = generator.generate(&request(Angle::Front)).await.unwrap();
        let second = generator.generate(&request(Angle::Front)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.requests()[0].prompt, mock.requests()[1].prompt);
    }

    #[tokio::test]
    async fn test_generate_makes_exactly_one_provider_call() {
        let mock = Arc::new(MockProvider::new());
        mock.push_error(ProviderError::Transport("connection reset".to_string()));
        mock.push_image(&[1]);

        // A failed attempt must not be retried internally
        let result = generator(Arc::clone(&mock)).generate(&request(Angle::Front)).await;
        assert!(result.is_err());
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.remaining(), 1);
    }
}
