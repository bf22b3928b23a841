//! Detector port implementations.

pub mod scripted;
pub mod zerogpt;

pub use scripted::ScriptedDetector;
pub use zerogpt::ZeroGptDetector;
