use crate::prelude::*;
use docsite_core::limits::DisplayLimits;
use std::path::Path;

/// Load display limits from a TOML file, or use the defaults
pub fn load_limits(path: Option<&Path>) -> Result<DisplayLimits> {
    let Some(path) = path else {
        return Ok(DisplayLimits::default());
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read config file '{}': {}", path.display(), e))?;

    let limits = parse_limits(&content)
        .wrap_err_with(|| f!("Invalid config file '{}'", path.display()))?;

    log::info!("loaded display limits from {}", path.display());
    Ok(limits)
}

fn parse_limits(content: &str) -> Result<DisplayLimits> {
    let limits: DisplayLimits = toml::from_str(content)?;

    if limits.search_page_size == 0 || limits.imported_by_page_size == 0 {
        return Err(eyre!("page sizes must be at least 1"));
    }
    if limits.search_link_count == 0 || limits.imported_by_link_count == 0 {
        return Err(eyre!("link counts must be at least 1"));
    }
    if limits.max_page_size < limits.search_page_size {
        return Err(eyre!(
            "max_page_size ({}) is smaller than search_page_size ({})",
            limits.max_page_size,
            limits.search_page_size
        ));
    }

    Ok(limits)
}
