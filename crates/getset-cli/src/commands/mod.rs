pub mod balance;
pub mod completions;
pub mod config;
pub mod gaps;
mod input;
pub mod load;
pub mod recharge;
pub mod rule;
pub mod suggest;
