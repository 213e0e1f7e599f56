#![doc = include_str!("../README.md")]

pub mod binds;
pub mod parser;
pub mod script;
pub mod term;
