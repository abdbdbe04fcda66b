//! Client modules for external AWS service interactions

pub mod dialogue;
pub mod generation;

pub use dialogue::{DialogueService, LexDialogue};
pub use generation::{BedrockGeneration, GenerationService};
