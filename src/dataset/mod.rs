//----------------------------------------
// dataset mod
//----------------------------------------
pub mod build;
pub mod types;
