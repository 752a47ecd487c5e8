//! Showroom - transform, material and animation core for a 3D model viewer

pub mod core;
pub mod scene;
pub mod material;
pub mod animation;
pub mod asset;
pub mod controls;
pub mod session;
