//! Pushes the accent color of the current settings onto the render surface.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wiki_settings_sdk::{RenderSurface, Settings, ThemeValue};

use super::color::{Hsl, hex_to_hsl};
use super::store::SettingsView;

pub const ACCENT_HUE: &str = "--color-accent-h";
pub const ACCENT_SATURATION: &str = "--color-accent-s";
pub const ACCENT_LIGHTNESS: &str = "--color-accent-l";

/// Last accent written to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTheme {
    pub color: String,
    pub hsl: Hsl,
}

/// Sole writer of the accent theme variables.
pub struct ThemeApplier {
    surface: Arc<dyn RenderSurface>,
    applied: ArcSwapOption<AppliedTheme>,
}

impl ThemeApplier {
    pub fn new(surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            surface,
            applied: ArcSwapOption::empty(),
        }
    }

    #[must_use]
    pub fn applied(&self) -> Option<Arc<AppliedTheme>> {
        self.applied.load_full()
    }

    /// Apply the accent of `settings`, returning the HSL now on the surface.
    ///
    /// Nothing is written when the color is unchanged. A malformed color
    /// leaves the previously applied variables in place and returns `None`.
    pub fn apply(&self, settings: &Settings) -> Option<Hsl> {
        {
            let applied = self.applied.load();
            if let Some(current) = applied.as_deref()
                && current.color == settings.primary_color
            {
                return Some(current.hsl);
            }
        }

        let Some(hsl) = hex_to_hsl(&settings.primary_color) else {
            warn!(color = %settings.primary_color, "ignoring malformed accent color");
            return None;
        };

        self.surface
            .set_variable(ACCENT_HUE, ThemeValue::Number(hsl.h));
        self.surface
            .set_variable(ACCENT_SATURATION, ThemeValue::Percent(hsl.s));
        self.surface
            .set_variable(ACCENT_LIGHTNESS, ThemeValue::Percent(hsl.l));
        self.applied.store(Some(Arc::new(AppliedTheme {
            color: settings.primary_color.clone(),
            hsl,
        })));

        debug!(color = %settings.primary_color, h = hsl.h, s = hsl.s, l = hsl.l, "applied accent theme");
        Some(hsl)
    }

    /// Re-apply on every published settings change until the store goes away.
    pub fn watch(self: &Arc<Self>, mut settings: watch::Receiver<SettingsView>) -> JoinHandle<()> {
        let applier = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let current = settings.borrow_and_update().settings.clone();
                let _ = applier.apply(&current);
                if settings.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSurface {
        writes: Mutex<Vec<(String, ThemeValue)>>,
    }

    impl RenderSurface for RecordingSurface {
        fn set_variable(&self, name: &str, value: ThemeValue) {
            self.writes.lock().push((name.to_owned(), value));
        }
    }

    fn with_color(color: &str) -> Settings {
        Settings {
            primary_color: color.to_owned(),
            ..Settings::default()
        }
    }

    #[test]
    fn default_accent_writes_three_variables() {
        let surface = Arc::new(RecordingSurface::default());
        let applier = ThemeApplier::new(surface.clone());

        let hsl = applier.apply(&Settings::default());

        assert_eq!(hsl, Some(Hsl { h: 355, s: 63, l: 48 }));
        assert_eq!(
            *surface.writes.lock(),
            vec![
                (ACCENT_HUE.to_owned(), ThemeValue::Number(355)),
                (ACCENT_SATURATION.to_owned(), ThemeValue::Percent(63)),
                (ACCENT_LIGHTNESS.to_owned(), ThemeValue::Percent(48)),
            ]
        );
    }

    #[test]
    fn malformed_color_keeps_previous_variables() {
        let surface = Arc::new(RecordingSurface::default());
        let applier = ThemeApplier::new(surface.clone());
        let _ = applier.apply(&with_color("#4f46e5"));

        assert_eq!(applier.apply(&with_color("not-a-color")), None);

        assert_eq!(surface.writes.lock().len(), 3);
        assert_eq!(applier.applied().unwrap().color, "#4f46e5");
    }

    #[test]
    fn unchanged_color_is_not_rewritten() {
        let surface = Arc::new(RecordingSurface::default());
        let applier = ThemeApplier::new(surface.clone());

        let _ = applier.apply(&with_color("#0891b2"));
        let renamed = Settings {
            app_name: "Other".to_owned(),
            ..with_color("#0891b2")
        };
        let _ = applier.apply(&renamed);

        assert_eq!(surface.writes.lock().len(), 3);
    }

    #[tokio::test]
    async fn watch_follows_published_settings() {
        let surface = Arc::new(RecordingSurface::default());
        let applier = Arc::new(ThemeApplier::new(surface.clone()));
        let (tx, rx) = watch::channel(SettingsView {
            settings: Settings::default(),
            loading: false,
            key: None,
        });

        let handle = applier.watch(rx);
        tx.send_modify(|view| view.settings.primary_color = "#059669".to_owned());
        drop(tx);
        handle.await.unwrap();

        assert_eq!(applier.applied().unwrap().color, "#059669");
    }
}
