pub mod episodes;
pub mod feedback;
pub mod interventions;
pub mod learner_state;

pub use feedback::FeedbackCommit;
