//! Tool orientation from a build-plane normal.
//!
//! The tool frame's Z axis points *into* the work surface, i.e. it is the
//! negated plane normal. From that frame we extract ZYX Euler angles
//! (yaw about Z, pitch about Y, roll about X) and from those a unit
//! quaternion in `(w, x, y, z)` order.
//!
//! Upstream producers currently only emit flat, horizontally sliced layers,
//! so in practice the normal is always `+Z`. The conversions below stay
//! fully general, but non-horizontal build planes are untested end to end.

use std::f64::consts::PI;

use nalgebra::{Quaternion, Rotation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::{Mat3, Vec3};

/// Normals shorter than this are treated as missing.
pub const NORMAL_EPSILON: f64 = 1e-9;

/// `cos(pitch)` below this is treated as gimbal lock.
pub const GIMBAL_EPSILON: f64 = 1e-9;

/// Above this |dot| with the X axis we switch the frame reference to Y.
const REFERENCE_SWITCH: f64 = 0.9;

/// ZYX Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerZyx {
    /// Rotation about Z.
    pub yaw: f64,
    /// Rotation about Y.
    pub pitch: f64,
    /// Rotation about X.
    pub roll: f64,
}

impl EulerZyx {
    /// Tool pointing straight down (180° about X).
    pub const TOOL_DOWN: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
        roll: PI,
    };

    /// Create from yaw, pitch and roll in radians.
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Yaw in degrees.
    pub fn yaw_deg(&self) -> f64 {
        self.yaw.to_degrees()
    }

    /// Pitch in degrees.
    pub fn pitch_deg(&self) -> f64 {
        self.pitch.to_degrees()
    }

    /// Roll in degrees.
    pub fn roll_deg(&self) -> f64 {
        self.roll.to_degrees()
    }

    /// Rotation matrix `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn to_matrix(&self) -> Mat3 {
        euler_to_matrix(self.yaw, self.pitch, self.roll)
    }

    /// Unit quaternion for these angles.
    pub fn to_quaternion(&self) -> Quat {
        euler_to_quaternion(self.yaw, self.pitch, self.roll)
    }
}

impl Default for EulerZyx {
    fn default() -> Self {
        Self::TOOL_DOWN
    }
}

/// A unit quaternion read in `(w, x, y, z)` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat(UnitQuaternion<f64>);

impl Quat {
    /// Normalize `(w, x, y, z)`; `None` if it is (near) zero.
    pub fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Option<Self> {
        UnitQuaternion::try_new(Quaternion::new(w, x, y, z), NORMAL_EPSILON).map(Self)
    }

    /// Scalar part.
    pub fn w(&self) -> f64 {
        self.0.w
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.0.i
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.0.j
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.0.k
    }

    /// Rotation matrix of this quaternion.
    pub fn to_matrix(&self) -> Mat3 {
        self.0.to_rotation_matrix().into_inner()
    }

    /// `[w, x, y, z]` as an array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.w(), self.x(), self.y(), self.z()]
    }

    /// The underlying nalgebra quaternion.
    pub fn as_unit(&self) -> &UnitQuaternion<f64> {
        &self.0
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self(UnitQuaternion::identity())
    }
}

impl From<UnitQuaternion<f64>> for Quat {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self(q)
    }
}

/// Build the orthonormal tool frame for a plane normal.
///
/// Columns are the tool X, Y and Z axes; tool Z is the negated normal.
/// Returns `None` for a (near) zero normal.
pub fn tool_frame(normal: &Vec3) -> Option<Mat3> {
    let len = normal.norm();
    if len < NORMAL_EPSILON {
        return None;
    }
    let z_axis = -normal / len;

    let reference = if z_axis.x.abs() > REFERENCE_SWITCH {
        Vec3::y()
    } else {
        Vec3::x()
    };

    let y_axis = z_axis.cross(&reference).normalize();
    let x_axis = y_axis.cross(&z_axis);

    Some(Mat3::from_columns(&[x_axis, y_axis, z_axis]))
}

/// Convert a build-plane normal into ZYX Euler angles.
///
/// The input does not need to be unit length. A near-zero normal yields
/// [`EulerZyx::TOOL_DOWN`].
pub fn normal_to_euler(normal: &Vec3) -> EulerZyx {
    match tool_frame(normal) {
        Some(r) => matrix_to_euler(&r),
        None => EulerZyx::TOOL_DOWN,
    }
}

/// Extract ZYX Euler angles from a rotation matrix.
pub fn matrix_to_euler(r: &Mat3) -> EulerZyx {
    let pitch = (-r[(2, 0)]).atan2((r[(0, 0)].powi(2) + r[(1, 0)].powi(2)).sqrt());

    if pitch.cos().abs() > GIMBAL_EPSILON {
        EulerZyx {
            yaw: r[(1, 0)].atan2(r[(0, 0)]),
            pitch,
            roll: r[(2, 1)].atan2(r[(2, 2)]),
        }
    } else {
        // Gimbal lock: yaw and roll share an axis, fold everything into yaw.
        EulerZyx {
            yaw: (-r[(0, 1)]).atan2(r[(1, 1)]),
            pitch,
            roll: 0.0,
        }
    }
}

/// Rotation matrix `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn euler_to_matrix(yaw: f64, pitch: f64, roll: f64) -> Mat3 {
    Rotation3::from_euler_angles(roll, pitch, yaw).into_inner()
}

/// Unit quaternion for ZYX angles.
pub fn euler_to_quaternion(yaw: f64, pitch: f64, roll: f64) -> Quat {
    Quat(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
}

/// Inverse of [`euler_to_quaternion`] for a raw `[w, x, y, z]`.
///
/// The input is normalized first; a (near) zero quaternion yields zero angles.
pub fn quaternion_to_euler(wxyz: [f64; 4]) -> EulerZyx {
    let [w, x, y, z] = wxyz;
    match Quat::from_wxyz(w, x, y, z) {
        Some(q) => matrix_to_euler(&q.to_matrix()),
        None => EulerZyx::new(0.0, 0.0, 0.0),
    }
}
