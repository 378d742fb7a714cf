//! Orchestration result types.

use fitcheck_store::AngleImages;
use fitcheck_utils::{Angle, GenerationError, ImagePayload};

/// Outcome of one angle's generation attempt: a produced image or an
/// absence marker carrying the failure reason. Never both. Once the
/// orchestrator records a failure for an angle it is final for that run.
#[derive(Debug)]
pub enum GenerationResult {
    /// The provider produced an image for this angle.
    Generated(ImagePayload),
    /// This angle failed; the reason is retained for logging.
    Failed(GenerationError),
}

impl GenerationResult {
    /// The generated image, if this angle succeeded.
    #[must_use]
    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            Self::Generated(image) => Some(image),
            Self::Failed(_) => None,
        }
    }

    /// The failure reason, if this angle failed.
    #[must_use]
    pub fn failure(&self) -> Option<&GenerationError> {
        match self {
            Self::Generated(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Whether this angle produced an image.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// The reconciled outcome of one orchestration run: a result per angle
/// plus the designated primary image.
///
/// Not all angles are required to have succeeded, but a `MultiAngleResult`
/// always carries a usable primary: runs that cannot produce one fail
/// with `PrimaryGenerationFailed` instead of returning.
#[derive(Debug)]
pub struct MultiAngleResult {
    front: GenerationResult,
    back: GenerationResult,
    side: GenerationResult,
    primary: ImagePayload,
}

impl MultiAngleResult {
    /// Assemble a result. Normally done by the orchestrator.
    #[must_use]
    pub fn new(
        front: GenerationResult,
        back: GenerationResult,
        side: GenerationResult,
        primary: ImagePayload,
    ) -> Self {
        Self {
            front,
            back,
            side,
            primary,
        }
    }

    /// The outcome recorded for an angle.
    #[must_use]
    pub fn result(&self, angle: Angle) -> &GenerationResult {
        match angle {
            Angle::Front => &self.front,
            Angle::Back => &self.back,
            Angle::Side => &self.side,
        }
    }

    /// The image for an angle, if it succeeded.
    #[must_use]
    pub fn image(&self, angle: Angle) -> Option<&ImagePayload> {
        self.result(angle).image()
    }

    /// The failure reason for an angle, if it failed.
    #[must_use]
    pub fn failure(&self, angle: Angle) -> Option<&GenerationError> {
        self.result(angle).failure()
    }

    /// The designated primary image (front view, possibly from fallback).
    #[must_use]
    pub fn primary(&self) -> &ImagePayload {
        &self.primary
    }

    /// Angles that produced an image, in generation order.
    #[must_use]
    pub fn succeeded_angles(&self) -> Vec<Angle> {
        Angle::ALL
            .into_iter()
            .filter(|angle| self.image(*angle).is_some())
            .collect()
    }

    /// Per-angle images in the persisted record shape.
    #[must_use]
    pub fn angle_images(&self) -> AngleImages {
        AngleImages {
            front: self.image(Angle::Front).cloned(),
            back: self.image(Angle::Back).cloned(),
            side: self.image(Angle::Side).cloned(),
        }
    }
}
