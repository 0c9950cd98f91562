//! Body landmark identities and per-frame landmark storage.
//!
//! Identities follow the 33-point BlazePose topology. A [`LandmarkSet`] is a
//! fixed-size table indexed by [`Landmark`], so lookups never hash or allocate.

use crate::{geometry::Point2D, Error, Result};
use std::fmt;

/// Number of body landmarks produced by the pose model
pub const POSE_LANDMARK_COUNT: usize = 33;

/// BlazePose body landmark identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Landmark {
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

impl Landmark {
    /// All identities in model output order
    pub const ALL: [Landmark; POSE_LANDMARK_COUNT] = [
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

    /// Position of this landmark in the model output
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a landmark by model output index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human readable name, e.g. "left wrist"
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left eye inner",
            Self::LeftEye => "left eye",
            Self::LeftEyeOuter => "left eye outer",
            Self::RightEyeInner => "right eye inner",
            Self::RightEye => "right eye",
            Self::RightEyeOuter => "right eye outer",
            Self::LeftEar => "left ear",
            Self::RightEar => "right ear",
            Self::MouthLeft => "mouth left",
            Self::MouthRight => "mouth right",
            Self::LeftShoulder => "left shoulder",
            Self::RightShoulder => "right shoulder",
            Self::LeftElbow => "left elbow",
            Self::RightElbow => "right elbow",
            Self::LeftWrist => "left wrist",
            Self::RightWrist => "right wrist",
            Self::LeftPinky => "left pinky",
            Self::RightPinky => "right pinky",
            Self::LeftIndex => "left index",
            Self::RightIndex => "right index",
            Self::LeftThumb => "left thumb",
            Self::RightThumb => "right thumb",
            Self::LeftHip => "left hip",
            Self::RightHip => "right hip",
            Self::LeftKnee => "left knee",
            Self::RightKnee => "right knee",
            Self::LeftAnkle => "left ankle",
            Self::RightAnkle => "right ankle",
            Self::LeftHeel => "left heel",
            Self::RightHeel => "right heel",
            Self::LeftFootIndex => "left foot index",
            Self::RightFootIndex => "right foot index",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Skeleton edges drawn between landmarks
pub const POSE_CONNECTIONS: [(Landmark, Landmark); 35] = {
    use Landmark::*;
    [
        (Nose, LeftEyeInner),
        (LeftEyeInner, LeftEye),
        (LeftEye, LeftEyeOuter),
        (LeftEyeOuter, LeftEar),
        (Nose, RightEyeInner),
        (RightEyeInner, RightEye),
        (RightEye, RightEyeOuter),
        (RightEyeOuter, RightEar),
        (MouthLeft, MouthRight),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (LeftWrist, LeftPinky),
        (LeftWrist, LeftIndex),
        (LeftWrist, LeftThumb),
        (LeftPinky, LeftIndex),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (RightWrist, RightPinky),
        (RightWrist, RightIndex),
        (RightWrist, RightThumb),
        (RightPinky, RightIndex),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (RightHip, RightKnee),
        (LeftKnee, LeftAnkle),
        (RightKnee, RightAnkle),
        (LeftAnkle, LeftHeel),
        (RightAnkle, RightHeel),
        (LeftHeel, LeftFootIndex),
        (RightHeel, RightFootIndex),
        (LeftAnkle, LeftFootIndex),
        (RightAnkle, RightFootIndex),
    ]
};

/// Landmark positions for a single frame
///
/// Each present landmark also carries the model's visibility estimate in
/// `[0, 1]`. Visibility never removes a landmark from the set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSet {
    points: [Option<Point2D>; POSE_LANDMARK_COUNT],
    visibility: [f32; POSE_LANDMARK_COUNT],
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            points: [None; POSE_LANDMARK_COUNT],
            visibility: [0.0; POSE_LANDMARK_COUNT],
        }
    }
}

impl LandmarkSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position of a fully visible landmark
    pub fn insert(&mut self, landmark: Landmark, point: Point2D) {
        self.insert_with_visibility(landmark, point, 1.0);
    }

    /// Set the position of a landmark together with its visibility
    pub fn insert_with_visibility(&mut self, landmark: Landmark, point: Point2D, visibility: f32) {
        self.points[landmark.index()] = Some(point);
        self.visibility[landmark.index()] = visibility;
    }

    /// Remove a landmark, returning its previous position
    pub fn remove(&mut self, landmark: Landmark) -> Option<Point2D> {
        self.visibility[landmark.index()] = 0.0;
        self.points[landmark.index()].take()
    }

    /// Position of a landmark if present
    #[must_use]
    pub fn get(&self, landmark: Landmark) -> Option<Point2D> {
        self.points[landmark.index()]
    }

    /// Visibility of a landmark if present
    #[must_use]
    pub fn visibility(&self, landmark: Landmark) -> Option<f32> {
        self.points[landmark.index()].map(|_| self.visibility[landmark.index()])
    }

    /// Position of a landmark that must be present and finite
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the landmark is absent or malformed
    pub fn require(&self, landmark: Landmark) -> Result<Point2D> {
        self.get(landmark)
            .filter(Point2D::is_finite)
            .ok_or(Error::MissingLandmark(landmark))
    }

    /// Iterate over present landmarks
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, Point2D)> + '_ {
        Landmark::ALL
            .iter()
            .zip(self.points.iter())
            .filter_map(|(&landmark, point)| point.map(|p| (landmark, p)))
    }

    /// Number of present landmarks
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Whether no landmark is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }
}

impl FromIterator<(Landmark, Point2D)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (Landmark, Point2D)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (landmark, point) in iter {
            set.insert(landmark, point);
        }
        set
    }
}
