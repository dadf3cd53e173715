pub mod identity;
pub mod storage;
pub mod surface;
