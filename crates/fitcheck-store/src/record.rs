//! The persisted try-on aggregate.

use chrono::{DateTime, Utc};
use fitcheck_utils::{Angle, ImagePayload, ImageSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-angle generated images. A `None` slot means that angle failed for
/// the run; the failure reason is logged, not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleImages {
    /// Front view, if generated.
    pub front: Option<ImagePayload>,
    /// Back view, if generated.
    pub back: Option<ImagePayload>,
    /// Side view, if generated.
    pub side: Option<ImagePayload>,
}

impl AngleImages {
    /// The image for a specific angle, if that angle succeeded.
    #[must_use]
    pub fn get(&self, angle: Angle) -> Option<&ImagePayload> {
        match angle {
            Angle::Front => self.front.as_ref(),
            Angle::Back => self.back.as_ref(),
            Angle::Side => self.side.as_ref(),
        }
    }

    /// Angles that produced an image, in generation order.
    #[must_use]
    pub fn present_angles(&self) -> Vec<Angle> {
        Angle::ALL
            .into_iter()
            .filter(|angle| self.get(*angle).is_some())
            .collect()
    }
}

/// One persisted try-on: inputs, primary result, per-angle outcomes, and
/// caller-supplied metadata. Created once per successful orchestration
/// run; immutable on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnRecord {
    /// Record id.
    pub id: Uuid,
    /// Owning user, absent for anonymous try-ons.
    pub user_id: Option<Uuid>,
    /// The person photo the run was given.
    pub person_image: ImagePayload,
    /// The garment photo the run was given.
    pub garment_image: ImagePayload,
    /// The designated primary image (front view, possibly from fallback).
    pub result_image: ImagePayload,
    /// Per-angle outcomes under the literal `front`/`back`/`side` keys.
    pub multi_angle: AngleImages,
    /// Free-text garment description.
    #[serde(default)]
    pub garment_description: String,
    /// Whether the person image was uploaded or a saved reference photo.
    #[serde(default)]
    pub image_source: ImageSource,
    /// Caller-supplied tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the try-on is publicly visible. Defaults to private.
    #[serde(default)]
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitcheck_utils::MediaType;

    fn image(byte: u8) -> ImagePayload {
        ImagePayload::new(vec![byte], MediaType::Jpeg)
    }

    fn record() -> TryOnRecord {
        TryOnRecord {
            id: Uuid::new_v4(),
            user_id: None,
            person_image: image(1),
            garment_image: image(2),
            result_image: image(3),
            multi_angle: AngleImages {
                front: Some(image(3)),
                back: None,
                side: Some(image(4)),
            },
            garment_description: "red jacket".to_string(),
            image_source: ImageSource::Uploaded,
            tags: vec!["jacket".to_string()],
            is_public: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_angle_images_accessors() {
        let rec = record();
        assert!(rec.multi_angle.get(Angle::Front).is_some());
        assert!(rec.multi_angle.get(Angle::Back).is_none());
        assert_eq!(
            rec.multi_angle.present_angles(),
            vec![Angle::Front, Angle::Side]
        );
    }

    #[test]
    fn test_record_serializes_angle_slots_with_literal_keys() {
        let rec = record();
        let value = serde_json::to_value(&rec).unwrap();

        // Literal angle labels; a failed angle serializes as null
        assert!(value["multi_angle"]["front"].is_object());
        assert!(value["multi_angle"]["back"].is_null());
        assert!(value["multi_angle"]["side"].is_object());
        assert_eq!(value["image_source"], "uploaded");
    }

    #[test]
    fn test_record_json_round_trip() {
        let rec = record();
        let encoded = serde_json::to_string(&rec).unwrap();
        let decoded: TryOnRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, rec);
    }
}
