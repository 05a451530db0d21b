// Library exports for the binary and integration tests

pub mod app;
pub mod cd;
pub mod config;
pub mod isrc;
pub mod musicbrainz;
pub mod prompt;
pub mod select;
pub mod submission;

pub use app::AppError;
pub use isrc::Isrc;
