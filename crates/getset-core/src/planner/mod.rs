//! The "add a recharge" flow: suggest recharges for free time and keep
//! the ones the user placed.

mod engine;
mod slot;

pub use engine::{RechargePlanner, RechargeSuggestion};
pub use slot::{RechargeSlot, SlotBook};
