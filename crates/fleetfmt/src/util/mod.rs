pub mod mapper;
pub mod quote;

pub use quote::{decode, render, ScalarStyle};
