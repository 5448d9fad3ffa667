//! Stores functionality that should be shared between different clients
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]

mod client;
mod store;

pub use client::{Client, UiCallBack, DUMMY_ARGUMENT};
pub use store::LimitStore;
