mod error;
mod session;
mod types;

pub use error::QuizError;
pub use session::QuizSession;
pub use types::{QuizAnswer, QuizRecord};
