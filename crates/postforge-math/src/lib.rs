#![warn(missing_docs)]

//! Math types for the postforge program generator.
//!
//! Thin wrappers around nalgebra providing the point, vector and rotation
//! types used by the toolpath model and the vendor backends, plus the
//! orientation conversions between a build-plane normal, ZYX Euler angles
//! and unit quaternions.

use nalgebra::{Matrix3, Vector3};

pub mod orientation;

pub use orientation::{
    euler_to_matrix, euler_to_quaternion, matrix_to_euler, normal_to_euler, quaternion_to_euler,
    tool_frame, EulerZyx, Quat,
};

/// A point in 3D space (mm).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 3x3 rotation matrix.
pub type Mat3 = Matrix3<f64>;

/// The build-plane "up" axis used when a segment carries no normal.
pub fn up() -> Vec3 {
    Vec3::z()
}

/// Convert a `[x, y, z]` array into a point.
pub fn point_from_array(p: [f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

/// Distance between two positions given as arrays.
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    (point_from_array(b) - point_from_array(a)).norm()
}
