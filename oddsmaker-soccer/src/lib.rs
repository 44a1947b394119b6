#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod data;
pub mod domain;
pub mod generator;
pub mod model;
pub mod pricing;
pub mod print;
pub mod strength;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
