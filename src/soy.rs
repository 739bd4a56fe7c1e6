//! Main module for soyparse library functionality

pub mod ast;
pub mod formats;
pub mod namespace;
pub mod parser;
pub mod processor;
pub mod testing;
