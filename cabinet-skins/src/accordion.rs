//! Accordion - stacked sections, one open at a time, toggled by click.

use cabinet::{CabinetConfig, CabinetOptions, ConfigError, PartNames};

pub const NAME: &str = "accordion";

pub fn part_names() -> PartNames {
    PartNames::prefixed(NAME)
}

/// The accordion config.
pub fn accordion() -> Result<CabinetConfig, ConfigError> {
    accordion_with(CabinetOptions::new())
}

/// The accordion config with extra options merged in.
///
/// Part names in `options` are replaced by the accordion's own.
pub fn accordion_with(options: CabinetOptions) -> Result<CabinetConfig, ConfigError> {
    let options = CabinetOptions {
        open_on_hover: options.open_on_hover.or(Some(false)),
        allow_multiple_open: options.allow_multiple_open.or(Some(false)),
        ..options
    }
    .part_names(part_names());
    CabinetConfig::new(options)
}
