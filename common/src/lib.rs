pub mod prelude;
pub mod vertex;
pub mod vfile;
pub mod vimage;
