// Domain layer - Selection state, gesture rules and job data

pub mod errors;
pub mod mixer;
pub mod model;
pub mod rules;
pub mod selection;
