pub mod burn;
pub mod segments;
pub mod transcribe;
pub mod video;
