#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod config;
pub mod events;
pub mod mailbox;
pub mod processors;
pub mod sessions;
pub mod telegram;
pub mod utils;
