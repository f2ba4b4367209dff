//! Cabinet configuration.
//!
//! A [`CabinetConfig`] is owned by the [`Cabinet`](crate::Cabinet) and pushed
//! to every drawer as an immutable snapshot whenever it changes. Options come
//! in through [`CabinetOptions`], which mirrors the JSON accepted by
//! [`CabinetConfig::from_json`].

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Delay used to coalesce hover transitions between a trigger and its contents.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(5);

/// The named parts of a cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The cabinet container.
    Cabinet,
    /// The element that opens and closes a drawer.
    DrawerTrigger,
    /// The element revealed when a drawer is open.
    DrawerContents,
    /// Element whose class follows its drawer's open state.
    DrawerClass,
}

impl Part {
    pub const ALL: [Part; 4] = [
        Part::Cabinet,
        Part::DrawerTrigger,
        Part::DrawerContents,
        Part::DrawerClass,
    ];

    /// The name this part has when not renamed by a skin.
    pub fn default_name(self) -> &'static str {
        match self {
            Part::Cabinet => "cabinet",
            Part::DrawerTrigger => "drawerTrigger",
            Part::DrawerContents => "drawerContents",
            Part::DrawerClass => "drawerClass",
        }
    }
}

/// Names under which the cabinet parts are registered.
///
/// Skins rename the parts (an accordion calls its trigger `accordionTrigger`).
/// Element classes are derived from these names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartNames {
    pub cabinet: String,
    pub drawer_trigger: String,
    pub drawer_contents: String,
    pub drawer_class: String,
}

impl Default for PartNames {
    fn default() -> Self {
        Self {
            cabinet: Part::Cabinet.default_name().into(),
            drawer_trigger: Part::DrawerTrigger.default_name().into(),
            drawer_contents: Part::DrawerContents.default_name().into(),
            drawer_class: Part::DrawerClass.default_name().into(),
        }
    }
}

impl PartNames {
    /// Names built from a common prefix: `accordion`, `accordionTrigger`, ...
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            cabinet: prefix.into(),
            drawer_trigger: format!("{}Trigger", prefix),
            drawer_contents: format!("{}Contents", prefix),
            drawer_class: format!("{}Class", prefix),
        }
    }

    pub fn get(&self, part: Part) -> &str {
        match part {
            Part::Cabinet => &self.cabinet,
            Part::DrawerTrigger => &self.drawer_trigger,
            Part::DrawerContents => &self.drawer_contents,
            Part::DrawerClass => &self.drawer_class,
        }
    }
}

/// Errors produced while building or updating a [`CabinetConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options JSON could not be parsed.
    #[error("Invalid cabinet options: {0}")]
    Json(#[from] serde_json::Error),

    /// A part was given an empty name.
    #[error("Part name for {0:?} must not be empty")]
    EmptyPartName(Part),

    /// A drawer index appears in both `opened` and `closed`.
    #[error("Drawer {0} is listed as both opened and closed")]
    ConflictingInitialState(usize),

    /// Part names were passed to `copy_options` after creation.
    #[error("Part names can only be set when the config is created")]
    PartNamesFrozen,
}

/// Partial cabinet options. Unset fields leave the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetOptions {
    pub open_on_hover: Option<bool>,
    pub one_always_open: Option<bool>,
    pub allow_multiple_open: Option<bool>,
    pub opened: Option<Vec<usize>>,
    pub closed: Option<Vec<usize>>,
    /// Read from `debounceMs` in JSON.
    #[serde(rename = "debounceMs", default, deserialize_with = "debounce_from_millis")]
    pub debounce: Option<Duration>,
    #[serde(alias = "directiveNames")]
    pub part_names: Option<PartNames>,
    pub element_classes: Option<HashMap<String, String>>,
}

impl CabinetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_on_hover(mut self, value: bool) -> Self {
        self.open_on_hover = Some(value);
        self
    }

    pub fn one_always_open(mut self, value: bool) -> Self {
        self.one_always_open = Some(value);
        self
    }

    pub fn allow_multiple_open(mut self, value: bool) -> Self {
        self.allow_multiple_open = Some(value);
        self
    }

    pub fn opened(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.opened = Some(indices.into());
        self
    }

    pub fn closed(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.closed = Some(indices.into());
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = Some(delay);
        self
    }

    pub fn part_names(mut self, names: PartNames) -> Self {
        self.part_names = Some(names);
        self
    }

    /// Override the element class for a part name.
    pub fn element_class(mut self, part_name: impl Into<String>, class: impl Into<String>) -> Self {
        self.element_classes
            .get_or_insert_with(HashMap::new)
            .insert(part_name.into(), class.into());
        self
    }
}

fn debounce_from_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

/// Behavior options for a cabinet and its drawers.
///
/// # Example
///
/// ```
/// use cabinet::{CabinetConfig, Part};
///
/// let config = CabinetConfig::default().with_open_on_hover(true);
/// assert!(config.open_on_hover);
/// assert_eq!(config.element_class(Part::DrawerTrigger), "drawer-trigger");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CabinetConfig {
    /// Open drawers when the pointer enters their trigger or contents.
    pub open_on_hover: bool,

    /// Refuse to close the last open drawer.
    pub one_always_open: bool,

    /// Allow more than one drawer open at a time.
    pub allow_multiple_open: bool,

    /// Drawers opened when they are added.
    pub opened: Vec<usize>,

    /// Drawers kept closed when they are added, even with `one_always_open`.
    pub closed: Vec<usize>,

    /// Debounce delay for open/close requests.
    ///
    /// Default: 5 ms
    pub debounce: Duration,

    part_names: PartNames,

    /// Keyed by part name, not by [`Part`].
    element_classes: HashMap<String, String>,
}

impl Default for CabinetConfig {
    fn default() -> Self {
        let part_names = PartNames::default();
        let element_classes = derive_element_classes(&part_names);
        Self {
            open_on_hover: false,
            one_always_open: false,
            allow_multiple_open: false,
            opened: Vec::new(),
            closed: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
            part_names,
            element_classes,
        }
    }
}

impl CabinetConfig {
    /// Build a config from options. Part names may only be set here.
    pub fn new(options: CabinetOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(names) = &options.part_names {
            for part in Part::ALL {
                if names.get(part).is_empty() {
                    return Err(ConfigError::EmptyPartName(part));
                }
            }
            config.element_classes = derive_element_classes(names);
            config.part_names = names.clone();
        }

        config.apply(options)?;
        Ok(config)
    }

    /// Parse options from JSON and build a config.
    ///
    /// Keys are camelCase: `openOnHover`, `oneAlwaysOpen`,
    /// `allowMultipleOpen`, `opened`, `closed`, `debounceMs`, `partNames`
    /// (or `directiveNames`) and `elementClasses`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: CabinetOptions = serde_json::from_str(json)?;
        Self::new(options)
    }

    /// Merge options into an existing config.
    ///
    /// On error the config is left unchanged.
    pub fn copy_options(&mut self, options: CabinetOptions) -> Result<(), ConfigError> {
        if options.part_names.is_some() {
            return Err(ConfigError::PartNamesFrozen);
        }
        self.apply(options)
    }

    fn apply(&mut self, options: CabinetOptions) -> Result<(), ConfigError> {
        let opened = options.opened.as_ref().unwrap_or(&self.opened);
        let closed = options.closed.as_ref().unwrap_or(&self.closed);
        if let Some(&index) = opened.iter().find(|i| closed.contains(i)) {
            return Err(ConfigError::ConflictingInitialState(index));
        }

        if let Some(value) = options.open_on_hover {
            self.open_on_hover = value;
        }
        if let Some(value) = options.one_always_open {
            self.one_always_open = value;
        }
        if let Some(value) = options.allow_multiple_open {
            self.allow_multiple_open = value;
        }
        if let Some(opened) = options.opened {
            self.opened = opened;
        }
        if let Some(closed) = options.closed {
            self.closed = closed;
        }
        if let Some(delay) = options.debounce {
            self.debounce = delay;
        }
        if let Some(classes) = options.element_classes {
            self.element_classes.extend(classes);
        }
        Ok(())
    }

    pub fn with_open_on_hover(mut self, value: bool) -> Self {
        self.open_on_hover = value;
        self
    }

    pub fn with_one_always_open(mut self, value: bool) -> Self {
        self.one_always_open = value;
        self
    }

    pub fn with_allow_multiple_open(mut self, value: bool) -> Self {
        self.allow_multiple_open = value;
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn part_names(&self) -> &PartNames {
        &self.part_names
    }

    /// The (possibly renamed) name of a part.
    pub fn part_name(&self, part: Part) -> &str {
        self.part_names.get(part)
    }

    /// The element class applied to a part.
    pub fn element_class(&self, part: Part) -> &str {
        let name = self.part_name(part);
        self.element_classes
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// The class a part carries while its drawer is open.
    pub fn open_class(&self, part: Part) -> String {
        format!("{}-open", self.element_class(part))
    }

    /// Swap `class_to_replace` for the part's current element class.
    ///
    /// Returns the class now applied, to be passed back on the next call.
    pub fn replace_element_class(
        &self,
        part: Part,
        classes: &mut Vec<String>,
        class_to_replace: &str,
    ) -> String {
        let new_class = self.element_class(part);
        if new_class != class_to_replace {
            classes.retain(|c| c != class_to_replace);
            if !classes.iter().any(|c| c == new_class) {
                classes.push(new_class.to_string());
            }
        }
        new_class.to_string()
    }
}

fn derive_element_classes(names: &PartNames) -> HashMap<String, String> {
    Part::ALL
        .iter()
        .map(|&part| {
            let name = names.get(part);
            (name.to_string(), kebab_case(name))
        })
        .collect()
}

/// Convert a camelCase name to kebab-case: `drawerTrigger` -> `drawer-trigger`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (pos, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if pos > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
