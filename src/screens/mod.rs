pub mod camera;
pub mod gallery;
