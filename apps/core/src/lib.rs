pub mod action_executor;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod discovery;
pub mod history;
pub mod hotkey;
pub mod kv_store;
pub mod launcher_state;
pub mod logging;
pub mod model;
pub mod navigator;
pub mod overlay_state;
pub mod runtime;
pub mod search;
pub mod transport;
pub mod view;
