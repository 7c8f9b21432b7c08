//----------------------------------------
// participant mod
//----------------------------------------
pub mod types;
