//! End-to-end detection tests grouped by concern.

mod config;
mod facade;
mod iso_bmff;
mod pipeline;
mod zip;
