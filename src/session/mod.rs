pub mod record;
pub mod state;
pub mod summary;

pub use record::{AnswerFeedback, AnswerRecord};
pub use state::{MAX_NAME_CHARS, Phase, QuizEvent, SessionError, SessionState, Step, transition};
pub use summary::{FeedbackTier, LevelTally, ResultRow, Summary, summarize, summarize_in};
