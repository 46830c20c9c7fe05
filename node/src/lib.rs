pub mod action;
pub mod env;
