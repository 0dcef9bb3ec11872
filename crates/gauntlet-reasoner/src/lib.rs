pub mod gemini;
pub mod mock;
pub mod reliable;

pub use gemini::GeminiReasoner;
pub use mock::{MockReasoner, MockReply};
pub use reliable::{ReliableReasoner, RetryConfig};
