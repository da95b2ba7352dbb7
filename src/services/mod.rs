pub mod capture_service;
pub mod gallery_service;
