pub mod schema;

use anyhow::{Context, Result};
pub use schema::{SpriteOptions, TestPageOptions};

pub fn load_from_yaml_str(s: &str) -> Result<SpriteOptions> {
    let opts: SpriteOptions = serde_yaml::from_str(s)?;
    Ok(opts)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<SpriteOptions> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    load_from_yaml_str(&data).with_context(|| format!("parsing options in {}", path.display()))
}
