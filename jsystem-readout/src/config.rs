use ini::Ini;

pub const DEFAULT_PATH: &str = "readout.ini";

/// Settings from the `[readout]` section. Missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadoutConfig {
    /// How many assembled vertices to print.
    pub max_vertices: usize,
    pub decode_textures: bool,
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        Self {
            max_vertices: 8,
            decode_textures: true,
        }
    }
}

impl ReadoutConfig {
    pub fn from_ini(ini: &Ini) -> Self {
        let mut config = Self::default();
        let Some(section) = ini.section(Some("readout")) else {
            return config;
        };

        if let Some(v) = section.get("max_vertices") {
            match v.trim().parse() {
                Ok(n) => config.max_vertices = n,
                Err(_) => log::warn!("max_vertices = {:?} is not a number, ignoring", v),
            }
        }
        if let Some(v) = section.get("decode_textures") {
            match v.trim().parse() {
                Ok(b) => config.decode_textures = b,
                Err(_) => log::warn!("decode_textures = {:?} is not true or false, ignoring", v),
            }
        }
        config
    }

    /// `readout.ini` in the working directory, or the defaults if there is none.
    pub fn load_default() -> Self {
        match Ini::load_from_file(DEFAULT_PATH) {
            Ok(ini) => Self::from_ini(&ini),
            Err(e) => {
                log::debug!("No {} ({}), using defaults", DEFAULT_PATH, e);
                Self::default()
            }
        }
    }
}
