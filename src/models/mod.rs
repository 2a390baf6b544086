pub mod lang;
pub mod question;
pub mod submission;

pub use lang::{LangInfo, DEFAULT_LANG};
pub use question::{CodeSnippet, Question, TopicTag};
pub use submission::{PollPolicy, SubmissionId, SubmissionResult, SubmitRequest, VerdictState};
