//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Compound operations open their
//! own transaction internally so callers never hold one across await
//! points.

pub mod segment_repo;
pub mod video_repo;

pub use segment_repo::SegmentRepo;
pub use video_repo::VideoRepo;
