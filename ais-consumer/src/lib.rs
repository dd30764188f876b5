#![deny(rust_2018_idioms)]

//! Implements a binary that continuously consumes the aisstream.io websocket feed and keeps the
//! latest known state of every vessel in an in-memory registry.

pub mod aisstream;
pub mod backoff;
pub mod consumer;
pub mod decoder;
pub mod error;
pub mod models;
pub mod settings;
pub mod startup;
