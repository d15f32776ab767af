use std::fs;
use std::path::Path;

use anyhow::Context;
use headtotoe_core::Timings;

/// Reads timings from a TOML file, missing keys keep their defaults.
pub fn load_timings(path: Option<&Path>) -> anyhow::Result<Timings> {
    let Some(path) = path else {
        return Ok(Timings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    parse_timings(&text).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn parse_timings(text: &str) -> anyhow::Result<Timings> {
    let timings: Timings = toml::from_str(text)?;
    if timings.hint_palette.is_empty() {
        log::warn!("Empty hint palette, hinted tiles will not be highlighted");
    }
    Ok(timings)
}
