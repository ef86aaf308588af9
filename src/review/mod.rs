//! Multi-specialist scientific paper review.

pub mod crew;
pub mod prompts;

pub use crew::{ReviewCrew, ReviewOutcome, SpecialistReview};
