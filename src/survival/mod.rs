//----------------------------------------
// survival mod
//----------------------------------------
pub mod cox;
pub mod error;
pub mod km;
