//! Background work: running submissions and expiring idle sessions

mod submission;
mod sweeper;

pub use submission::{Submission, SubmissionRunner};
pub use sweeper::SessionSweeper;
