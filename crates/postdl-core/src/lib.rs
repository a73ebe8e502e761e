//! Core of `postdl`: search a post API, then fetch every result with a
//! bounded pool of workers fed one task at a time.

pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod search;
pub mod storage;
pub mod task;
pub mod transport;
pub mod url_model;
