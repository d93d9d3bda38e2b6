//! The video library avatar steps pick their videos from.
//!
//! This is a lookup for editors. Validation only checks that a video is selected,
//! never that it exists here.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCategory {
    pub id: String,
    pub name: String,
    pub videos: Vec<Video>,
}

impl VideoCategory {
    pub fn video(&self, video_id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == video_id)
    }
}

/// Read-only category → videos mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoLibrary {
    categories: Vec<VideoCategory>,
}

impl VideoLibrary {
    pub fn new(categories: Vec<VideoCategory>) -> Self {
        Self { categories }
    }

    /// Parses a JSON array of categories.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Json(e.to_string()))
    }

    pub fn categories(&self) -> &[VideoCategory] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&VideoCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Finds a video by id in any category.
    pub fn find_video(&self, video_id: &str) -> Option<(&VideoCategory, &Video)> {
        self.categories
            .iter()
            .find_map(|c| c.video(video_id).map(|v| (c, v)))
    }

    /// The stock library shipped with the editor.
    pub fn mock() -> Self {
        fn category(id: &str, name: &str, videos: &[(&str, &str, &str)]) -> VideoCategory {
            VideoCategory {
                id: id.to_string(),
                name: name.to_string(),
                videos: videos
                    .iter()
                    .map(|(id, title, duration)| Video {
                        id: id.to_string(),
                        title: title.to_string(),
                        duration: duration.to_string(),
                    })
                    .collect(),
            }
        }

        Self::new(vec![
            category(
                "onboarding",
                "Onboarding",
                &[
                    ("vid_welcome", "Welcome to Medical Intake", "2:30"),
                    ("vid_consent", "Consent Form Overview", "3:15"),
                    ("vid_privacy", "Privacy Policy", "1:45"),
                ],
            ),
            category(
                "vitals",
                "Vitals Collection",
                &[
                    ("vid_height", "Height Measurement", "1:20"),
                    ("vid_weight", "Weight Measurement", "1:30"),
                    ("vid_bp", "Blood Pressure", "2:10"),
                    ("vid_temp", "Temperature Check", "1:15"),
                ],
            ),
            category(
                "symptoms",
                "Symptom Assessment",
                &[
                    ("vid_pain", "Pain Assessment", "2:45"),
                    ("vid_headache", "Headache Questions", "2:20"),
                    ("vid_fever", "Fever Symptoms", "1:50"),
                ],
            ),
            category(
                "emergency",
                "Emergency Protocols",
                &[
                    ("vid_emergency_exit", "Emergency Exit", "1:00"),
                    ("vid_urgent_care", "Urgent Care Referral", "1:30"),
                ],
            ),
        ])
    }
}
