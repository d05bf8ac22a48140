//! Web front-end that scores tumor measurements with a pre-trained
//! scaler and binary classifier.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod page;
pub mod state;
