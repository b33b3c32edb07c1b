#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub(crate) mod api;
pub mod app;
pub mod classification;
pub mod config;
pub mod observability;
pub mod pipeline;
pub mod profile;
pub mod scoring;
pub mod util;
