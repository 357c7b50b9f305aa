mod candidates;
mod chain_space;

pub use candidates::{
    CandidateIter,
    CandidateSpace,
};
pub use chain_space::{
    chain_options,
    count_chain_options,
};
