//! Sport-agnostic pricing primitives: Poisson goal distributions, probability slice utilities,
//! market framing under an overround, and conversions between odds formats.

#![allow(clippy::too_many_arguments)]

pub mod factorial;
pub mod format;
pub mod market;
pub mod poisson;
pub mod probs;
pub mod timed;

#[doc = include_str!("../../README.md")]
#[cfg(doc)]
fn readme() {}
