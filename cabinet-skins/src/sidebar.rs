//! Sidebar - a menu whose sections fly out while the pointer is over them.

use cabinet::{CabinetConfig, CabinetOptions, ConfigError, PartNames};

pub const NAME: &str = "sidebar";

pub fn part_names() -> PartNames {
    PartNames::prefixed(NAME)
}

/// The sidebar config.
pub fn sidebar() -> Result<CabinetConfig, ConfigError> {
    sidebar_with(CabinetOptions::new())
}

/// The sidebar config with extra options merged in.
///
/// Hover-to-open defaults to on. Part names in `options` are replaced by
/// the sidebar's own.
pub fn sidebar_with(options: CabinetOptions) -> Result<CabinetConfig, ConfigError> {
    let options = CabinetOptions {
        open_on_hover: options.open_on_hover.or(Some(true)),
        ..options
    }
    .part_names(part_names());
    CabinetConfig::new(options)
}
