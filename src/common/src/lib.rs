pub mod cli;
pub mod config;
pub mod directory;
pub mod model;
pub mod storage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
