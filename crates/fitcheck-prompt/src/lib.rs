//! Per-angle prompt table for fitcheck image generation
//!
//! The instruction sent to the image provider differs per viewing angle but
//! always constrains the model the same three ways: preserve the person's
//! identity, pose, and background; fit the garment naturally; emit image
//! output only. The table is a first-class configuration artifact so
//! deployments can swap prompts without touching generation code.

use fitcheck_utils::Angle;
use serde::{Deserialize, Serialize};

/// Default front-view instruction.
pub const DEFAULT_FRONT_PROMPT: &str = "Analyze the person in the first image and the clothing item in the second. \
     Create a realistic virtual try-on showing the person wearing the garment \
     from the FRONT VIEW. Maintain the person's pose, body proportions, and \
     background. The garment should fit naturally and look realistic. Output \
     only the final image.";

/// Default back-view instruction.
pub const DEFAULT_BACK_PROMPT: &str = "Analyze the person in the first image and the clothing item in the second. \
     Create a realistic virtual try-on showing the person wearing the garment \
     from the BACK VIEW. Rotate the person to show their back while \
     maintaining their body proportions and the garment's fit. The garment \
     should look natural from behind. Output only the final image.";

/// Default side-view instruction.
pub const DEFAULT_SIDE_PROMPT: &str = "Analyze the person in the first image and the clothing item in the second. \
     Create a realistic virtual try-on showing the person wearing the garment \
     from the SIDE VIEW (profile view). Show the person in a side pose that \
     clearly displays how the garment fits and drapes on their body. Maintain \
     realistic proportions and natural garment flow. Output only the final \
     image.";

/// One natural-language instruction per viewing angle.
///
/// Lookup is total and deterministic: [`for_angle`](Self::for_angle) always
/// returns the configured text verbatim. Label-based lookup keeps the
/// lenient behavior expected at string boundaries: an unrecognized label
/// falls back to the front prompt rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    front: String,
    back: String,
    side: String,
}

impl PromptSet {
    /// Build a prompt set from explicit per-angle instructions.
    #[must_use]
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        side: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            side: side.into(),
        }
    }

    /// The instruction for a specific angle, verbatim.
    #[must_use]
    pub fn for_angle(&self, angle: Angle) -> &str {
        match angle {
            Angle::Front => &self.front,
            Angle::Back => &self.back,
            Angle::Side => &self.side,
        }
    }

    /// Label-based lookup. Unrecognized labels fall back to the front
    /// prompt, the view every downstream consumer can use.
    #[must_use]
    pub fn for_label(&self, label: &str) -> &str {
        match label.to_ascii_lowercase().as_str() {
            "back" => &self.back,
            "side" => &self.side,
            _ => &self.front,
        }
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::new(DEFAULT_FRONT_PROMPT, DEFAULT_BACK_PROMPT, DEFAULT_SIDE_PROMPT)
    }
}
