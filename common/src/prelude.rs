pub use crate::vertex::{AssembledVertex, DrawRange, MeshData, Topology};
pub use crate::vfile::VFile;
pub use crate::vimage::DecodedImage;
