//! Ready-made cabinet skins.
//!
//! A skin is a [`CabinetConfig`] preset with its own part names, so its
//! elements carry their own classes (`accordion-trigger`, `sidebar-contents`).

pub mod accordion;
pub mod sidebar;

use cabinet::{CabinetConfig, CabinetOptions, ConfigError};

pub use accordion::{accordion, accordion_with};
pub use sidebar::{sidebar, sidebar_with};

/// The available skins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skin {
    Accordion,
    Sidebar,
}

impl Skin {
    pub const ALL: [Skin; 2] = [Skin::Accordion, Skin::Sidebar];

    pub fn name(self) -> &'static str {
        match self {
            Skin::Accordion => accordion::NAME,
            Skin::Sidebar => sidebar::NAME,
        }
    }

    /// Look a skin up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|skin| skin.name() == name)
    }

    /// The skin's config with extra options merged in.
    pub fn config_with(self, options: CabinetOptions) -> Result<CabinetConfig, ConfigError> {
        match self {
            Skin::Accordion => accordion_with(options),
            Skin::Sidebar => sidebar_with(options),
        }
    }

    pub fn config(self) -> Result<CabinetConfig, ConfigError> {
        self.config_with(CabinetOptions::new())
    }
}
