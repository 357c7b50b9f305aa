pub mod decoy;
mod fragment_mass_builder;
pub mod rules;

pub use fragment_mass_builder::FragmentMassBuilder;
pub use rules::{
    FragmentRule,
    DEFAULT_RULES,
};
