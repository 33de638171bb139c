mod config;

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use ini::Ini;
use jsystem::{
    bti::Bti,
    error::DecodeError,
    j3d::{inf1::Inf1, jnt1::Jnt1, J3DModel},
};
use thiserror::Error;

use crate::config::ReadoutConfig;

#[derive(Error, Debug)]
enum ReadoutError {
    #[error("usage: jsystem-readout <file.bti|file.bmd|file.bdl> [config.ini]")]
    Usage,
    #[error("don't know how to read {0:?}")]
    UnknownExtension(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("bad config: {0}")]
    Ini(#[from] ini::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ReadoutError> {
    let mut args = std::env::args_os().skip(1);
    let path = PathBuf::from(args.next().ok_or(ReadoutError::Usage)?);
    let config = match args.next() {
        Some(ini) => ReadoutConfig::from_ini(&Ini::load_from_file(ini)?),
        None => ReadoutConfig::load_default(),
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("bti") => readout_texture(&path, &config),
        Some("bmd" | "bdl") => readout_model(&path, &config),
        _ => Err(ReadoutError::UnknownExtension(path)),
    }
}

fn readout_texture(path: &Path, config: &ReadoutConfig) -> Result<(), ReadoutError> {
    let bti = Bti::load(fs::read(path)?)?;
    log::info!("{}: {:?}", path.display(), bti);
    log_texture("texture", &bti, config);
    Ok(())
}

fn log_texture(name: &str, bti: &Bti, config: &ReadoutConfig) {
    log::info!(
        "{} {}x{} {:?}, {} palette entries",
        name,
        bti.width(),
        bti.height(),
        bti.format(),
        bti.palette().len()
    );
    if !config.decode_textures {
        return;
    }
    match bti.image() {
        Ok(image) => log::info!(
            "  decoded {} bytes, first pixel {:?}",
            image.pixels.len(),
            image.pixel(0, 0)
        ),
        Err(e) => log::warn!("  {} does not decode: {}", name, e),
    }
}

fn readout_model(path: &Path, config: &ReadoutConfig) -> Result<(), ReadoutError> {
    let model = J3DModel::parse(fs::read(path)?)?;
    let header = model.header();
    log::info!(
        "{}: {}{}, {} bytes, {} chunks",
        path.display(),
        header.magic,
        header.kind,
        header.file_size,
        header.chunk_count
    );

    for chunk in model.chunks() {
        log::info!(
            "  {} @ {:#x}, {} bytes{}",
            chunk.tag(),
            chunk.offset,
            chunk.size(),
            if chunk.is_generic() { " (raw)" } else { "" }
        );
    }

    if let Some(inf1) = model.get::<Inf1>() {
        log::info!(
            "{} scene nodes, {} vertices, {} top level",
            inf1.nodes.len(),
            inf1.vertex_count,
            inf1.scene_graph().len()
        );
    }
    if let Some(jnt1) = model.get::<Jnt1>() {
        let names: Vec<&str> = jnt1.joints.iter().map(|j| j.name.as_str()).collect();
        log::info!("{} joints: {}", names.len(), names.join(", "));
    }

    match model.mesh() {
        Ok(mesh) => {
            log::info!(
                "{} vertices in {} draw ranges",
                mesh.vertices.len(),
                mesh.draw_ranges.len()
            );
            for v in mesh.vertices.iter().take(config.max_vertices) {
                log::info!("  {:?} {:?} {:?}", v.position, v.color, v.uv);
            }
        }
        Err(e) => log::warn!("No mesh: {}", e),
    }

    if let Some(tex1) = model.textures() {
        for (i, bti) in tex1.textures.iter().enumerate() {
            log_texture(tex1.name(i).unwrap_or("<unnamed>"), bti, config);
        }
    }

    Ok(())
}
