//----------------------------------------
// study mod
//----------------------------------------
pub mod engine;
pub mod error;
pub mod simulate;
pub mod types;
