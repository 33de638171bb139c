pub mod binaries;
pub mod bti;
pub mod error;
pub mod j3d;
pub mod prelude;
