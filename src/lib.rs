/*
    Top-level
*/

pub mod format;
pub mod harness;
pub mod oracle;
pub mod stimulus;

pub use format::*;
pub use oracle::*;
