pub mod create;
pub use create as Create;

pub mod vote;
pub use vote as Vote;

pub mod poll_vote;
pub use poll_vote as PollVote;

pub mod repost;
pub use repost as Repost;
