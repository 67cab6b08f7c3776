//! Pose orientation stored as an opaque unit quaternion.

use rand::Rng;
use serde::{Deserialize, Serialize};

// Integer-degree draw ranges for a presentation pose: a full random yaw with
// limited pitch and roll so shapes stay recognizably grounded.
const PITCH_DEG: (i32, i32) = (-35, 35);
const YAW_DEG: (i32, i32) = (0, 360);
const ROLL_DEG: (i32, i32) = (-25, 25);

/// Unit quaternion stored as `[x, y, z, w]`.
///
/// The session core treats orientations as opaque: the four floats are stored
/// verbatim, persisted verbatim, and replayed verbatim. Only the rendering
/// collaborator interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orientation(pub [f32; 4]);

impl Orientation {
    /// The identity pose.
    pub const IDENTITY: Self = Self([0.0, 0.0, 0.0, 1.0]);

    /// Draw a random presentation pose.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pitch = rng.gen_range(PITCH_DEG.0..=PITCH_DEG.1) as f32;
        let yaw = rng.gen_range(YAW_DEG.0..=YAW_DEG.1) as f32;
        let roll = rng.gen_range(ROLL_DEG.0..=ROLL_DEG.1) as f32;
        Self::from_euler_deg(pitch, yaw, roll)
    }

    /// Quaternion from XYZ-order Euler angles in degrees.
    #[must_use]
    pub fn from_euler_deg(x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        let (sx, cx) = (x_deg.to_radians() / 2.0).sin_cos();
        let (sy, cy) = (y_deg.to_radians() / 2.0).sin_cos();
        let (sz, cz) = (z_deg.to_radians() / 2.0).sin_cos();
        Self([
            sx * cy * cz + cx * sy * sz,
            cx * sy * cz - sx * cy * sz,
            cx * cy * sz + sx * sy * cz,
            cx * cy * cz - sx * sy * sz,
        ])
    }

    /// The raw `[x, y, z, w]` components.
    #[must_use]
    pub const fn as_array(&self) -> [f32; 4] {
        self.0
    }
}
