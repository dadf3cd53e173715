use std::collections::BTreeMap;
use std::fmt::Write as _;

use parking_lot::RwLock;
use wiki_settings_sdk::{RenderSurface, ThemeValue};

/// Render surface holding CSS custom properties for the document root.
#[derive(Default)]
pub struct CssVariables {
    variables: RwLock<BTreeMap<String, ThemeValue>>,
}

impl CssVariables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ThemeValue> {
        self.variables.read().get(name).copied()
    }

    /// `:root` rule declaring every variable, sorted by name.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.variables.read().iter() {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push('}');
        css
    }
}

impl RenderSurface for CssVariables {
    fn set_variable(&self, name: &str, value: ThemeValue) {
        self.variables.write().insert(name.to_owned(), value);
    }
}
