//! Text-to-speech through an asynchronous prediction API

pub mod mock;
pub mod poller;
pub mod provider;
pub mod replicate;
pub mod types;
