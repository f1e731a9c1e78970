//! Fundamental types: landmarks, frames and recordings.

use chrono::{DateTime, NaiveDateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Number of landmarks in the MediaPipe pose skeleton
pub const LANDMARK_COUNT: usize = 33;

/// 3D position in normalized image coordinates (x, y in [0, 1], z relative to hips)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Body side, used to pick the tracked (striking) arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// 33-landmark MediaPipe pose skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub const COUNT: usize = LANDMARK_COUNT;

    const ALL: [PoseLandmark; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }

    pub fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftShoulder,
            Side::Right => Self::RightShoulder,
        }
    }

    pub fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftElbow,
            Side::Right => Self::RightElbow,
        }
    }

    pub fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftWrist,
            Side::Right => Self::RightWrist,
        }
    }

    pub fn hip(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftHip,
            Side::Right => Self::RightHip,
        }
    }

    pub fn knee(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftKnee,
            Side::Right => Self::RightKnee,
        }
    }

    pub fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftAnkle,
            Side::Right => Self::RightAnkle,
        }
    }
}

/// A single tracked body point as produced by the pose extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: u8,
    /// Upstream landmark name (e.g. `RIGHT_WRIST`); informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl Landmark {
    pub fn new(id: u8, x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            id,
            name: None,
            x,
            y,
            z,
            visibility,
        }
    }

    pub fn kind(&self) -> Option<PoseLandmark> {
        PoseLandmark::from_index(self.id)
    }

    pub fn position(&self) -> Position3D {
        Position3D::new(self.x, self.y, self.z)
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }
}

/// All landmarks detected in one video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_number: u32,
    /// Seconds since the start of the video
    pub timestamp: f64,
    /// Empty when no subject was detected
    #[serde(default, alias = "keypoints")]
    pub landmarks: Vec<Landmark>,
}

impl Frame {
    pub fn new(frame_number: u32, timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_number,
            timestamp,
            landmarks,
        }
    }

    pub fn landmark(&self, kind: PoseLandmark) -> Option<&Landmark> {
        let id = kind.index();
        self.landmarks.iter().find(|l| l.id == id)
    }

    /// Landmark lookup gated on detection confidence
    pub fn visible(&self, kind: PoseLandmark, threshold: f64) -> Option<&Landmark> {
        self.landmark(kind).filter(|l| l.is_visible(threshold))
    }

    pub fn has_subject(&self) -> bool {
        !self.landmarks.is_empty()
    }
}

/// Video properties reported by the pose extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    pub fps: f64,
    pub total_frames: u64,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
}

/// Complete pose-extraction output for one video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseRecording {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_filename: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_processed_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_info: Option<VideoInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypoints_per_frame: Option<u32>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl PoseRecording {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    /// Parse either a full extraction document or a bare frame array
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            let frames: Vec<Frame> = serde_json::from_value(value)?;
            Ok(Self::from_frames(frames))
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    pub fn fps(&self) -> Option<f64> {
        self.video_info
            .as_ref()
            .map(|info| info.fps)
            .filter(|fps| *fps > 0.0)
    }
}

/// Accepts RFC 3339 or the naive ISO-8601 form the extractor writes (read as UTC)
fn deserialize_processed_at<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_processed_at(&s).map_err(serde::de::Error::custom))
        .transpose()
}

fn parse_processed_at(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid processed_at '{raw}': {e}"))
}

/// Reject malformed input before any measurement runs.
///
/// Frame numbers must be strictly increasing, timestamps finite and
/// non-decreasing, landmark ids within the 33-point skeleton and all
/// landmark values finite.
pub fn validate_frames(frames: &[Frame]) -> Result<()> {
    let mut previous: Option<&Frame> = None;

    for frame in frames {
        if !frame.timestamp.is_finite() {
            return Err(Error::InvalidInput(format!(
                "frame {}: timestamp is not finite",
                frame.frame_number
            )));
        }

        if let Some(prev) = previous {
            if frame.frame_number <= prev.frame_number {
                return Err(Error::InvalidInput(format!(
                    "frame numbers must be strictly increasing: {} follows {}",
                    frame.frame_number, prev.frame_number
                )));
            }
            if frame.timestamp < prev.timestamp {
                return Err(Error::InvalidInput(format!(
                    "frame {}: timestamp {} precedes previous timestamp {}",
                    frame.frame_number, frame.timestamp, prev.timestamp
                )));
            }
        }

        for landmark in &frame.landmarks {
            if landmark.id as usize >= LANDMARK_COUNT {
                return Err(Error::InvalidInput(format!(
                    "frame {}: landmark id {} outside [0, {}]",
                    frame.frame_number,
                    landmark.id,
                    LANDMARK_COUNT - 1
                )));
            }
            let values = [landmark.x, landmark.y, landmark.z, landmark.visibility];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidInput(format!(
                    "frame {}: landmark {} has non-finite values",
                    frame.frame_number, landmark.id
                )));
            }
        }

        previous = Some(frame);
    }

    Ok(())
}
