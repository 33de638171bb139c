pub use crate::bti::{
    consts::{ImageFormat, PaletteFormat, WrapMode},
    header::TextureHeader,
    palette::Palette,
    Bti,
};
pub use crate::error::{DecodeError, Result};
pub use crate::j3d::{
    attributes::VertexArrays,
    chunk::{Chunk, ChunkData, ChunkKind, FourCC},
    drw1::{DrawMatrix, Drw1},
    evp1::{Envelope, Evp1},
    header::ModelHeader,
    inf1::{Inf1, SceneNode},
    jnt1::{Joint, Jnt1},
    shp1::{Batch, Shp1},
    tex1::Tex1,
    vtx1::{VertexAttribute, Vtx1},
    J3DModel,
};
