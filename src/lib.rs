//! Guided code tours: discover `.tour` files in a repository and navigate
//! them step by step.
//!
//! The [`engine`] owns navigation state and publishes a [`model::ViewContext`]
//! plus a markdown panel body after every transition. Everything else feeds it:
//! [`discovery`] loads tours, [`queue`] serializes events, and [`cli`] drives
//! it from a terminal.

pub mod address;
pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod identity;
pub mod model;
pub mod publish;
pub mod queue;
pub mod registry;
