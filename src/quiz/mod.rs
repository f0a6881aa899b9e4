pub mod generator;
pub mod level;
pub mod vocabulary;

pub use generator::{GeneratorError, Question, QuestionGenerator, SamplingPolicy};
pub use level::{Field, Level, PromptKind};
pub use vocabulary::{VocabEntry, Vocabulary, VocabularyError};

/// Options shown per question: the answer plus three distractors.
pub const CHOICE_COUNT: usize = 4;
