mod aabb;
mod color;
mod planar;
mod sphere;

pub use aabb::AABB;
pub use color::{hex_to_rgb, linear_to_srgb, srgb_to_linear};
pub use planar::{from_planar, to_planar, PlanarRotation};
pub use sphere::BoundingSphere;
