#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod auth;
mod client;
mod config;
mod error;
mod tasks;
mod wire;

pub use crate::client::{ReqwestClient, TRACING_TARGET};
pub use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ReqwestConfig};
pub use crate::error::{Error, Result};
pub use crate::tasks::TaskClient;
