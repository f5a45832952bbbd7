// Public modules
pub mod content;
pub mod file_reference;
pub mod generate_content;
pub mod model;
pub mod outgoing_turn;
pub mod turn;
pub mod uploaded_file;

// Re-exports
pub use content::{Content, FileData, Part};
pub use file_reference::FileReference;
pub use generate_content::{
    Candidate, CandidateContent, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, PromptFeedback, ResponsePart, UsageMetadata,
};
pub use model::{KnownModel, Model};
pub use outgoing_turn::OutgoingTurn;
pub use turn::{ContentPart, Speaker, Turn};
pub use uploaded_file::{UploadFileMetadata, UploadFileRequest, UploadFileResponse};
