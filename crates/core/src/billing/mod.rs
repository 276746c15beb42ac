//! Plans and earnings

pub mod earnings;
pub mod plans;
