mod entity;
mod tally;
mod vote;
mod vote_value;

pub use entity::{Entity, EntityRef};
pub use tally::{Tally, TallyOptions, TallyOrder};
pub use vote::{Vote, VoteDirection};
pub use vote_value::{InvalidVoteValue, VoteValue};
