//! Mapping between stored documents and the `Settings` model.

use serde::de::DeserializeOwned;
use serde_json::Value;
use wiki_settings_sdk::{Document, Settings, SettingsPatch};

use super::color::Rgb;
use super::error::SettingsError;
use super::fields::SettingsFields;

/// Build a complete `Settings` from a stored document.
///
/// Every field that is missing or holds an illegal value is replaced with the
/// corresponding default, so the result is never partially undefined.
#[must_use]
pub fn sanitize(document: &Document) -> Settings {
    let defaults = Settings::default();
    let mut repaired = Vec::new();

    let app_name = document
        .get(SettingsFields::APP_NAME)
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_owned);
    let primary_color = document
        .get(SettingsFields::PRIMARY_COLOR)
        .and_then(Value::as_str)
        .filter(|color| color.parse::<Rgb>().is_ok())
        .map(str::to_owned);

    let settings = Settings {
        app_name: or_default(app_name, defaults.app_name, SettingsFields::APP_NAME, &mut repaired),
        logo: or_default(
            enum_field(document, SettingsFields::LOGO),
            defaults.logo,
            SettingsFields::LOGO,
            &mut repaired,
        ),
        primary_color: or_default(
            primary_color,
            defaults.primary_color,
            SettingsFields::PRIMARY_COLOR,
            &mut repaired,
        ),
        button_radius: or_default(
            enum_field(document, SettingsFields::BUTTON_RADIUS),
            defaults.button_radius,
            SettingsFields::BUTTON_RADIUS,
            &mut repaired,
        ),
        primary_button_style: or_default(
            enum_field(document, SettingsFields::PRIMARY_BUTTON_STYLE),
            defaults.primary_button_style,
            SettingsFields::PRIMARY_BUTTON_STYLE,
            &mut repaired,
        ),
    };

    if !repaired.is_empty() {
        tracing::debug!(fields = ?repaired, "repaired settings fields from defaults");
    }
    settings
}

fn enum_field<T: DeserializeOwned>(document: &Document, field: &str) -> Option<T> {
    document
        .get(field)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn or_default<T>(value: Option<T>, default: T, field: &'static str, repaired: &mut Vec<&'static str>) -> T {
    value.unwrap_or_else(|| {
        repaired.push(field);
        default
    })
}

/// Full document for a settings record.
#[must_use]
pub fn settings_to_document(settings: &Settings) -> Document {
    patch_to_document(&SettingsPatch::from(settings.clone()))
}

/// Document holding only the fields present in `patch`, for merge writes.
#[must_use]
pub fn patch_to_document(patch: &SettingsPatch) -> Document {
    let mut document = Document::new();
    if let Some(app_name) = &patch.app_name {
        document.insert(SettingsFields::APP_NAME.to_owned(), Value::from(app_name.as_str()));
    }
    if let Some(logo) = patch.logo {
        document.insert(SettingsFields::LOGO.to_owned(), Value::from(logo.as_str()));
    }
    if let Some(color) = &patch.primary_color {
        document.insert(SettingsFields::PRIMARY_COLOR.to_owned(), Value::from(color.as_str()));
    }
    if let Some(radius) = patch.button_radius {
        document.insert(SettingsFields::BUTTON_RADIUS.to_owned(), Value::from(radius.as_str()));
    }
    if let Some(style) = patch.primary_button_style {
        document.insert(
            SettingsFields::PRIMARY_BUTTON_STYLE.to_owned(),
            Value::from(style.as_str()),
        );
    }
    document
}

/// Reject patches that would put an illegal value into the record.
///
/// # Errors
/// Returns `SettingsError::Validation` naming the first offending field.
pub fn validate_patch(patch: &SettingsPatch, max_app_name_length: usize) -> Result<(), SettingsError> {
    if let Some(name) = &patch.app_name {
        if name.trim().is_empty() {
            return Err(SettingsError::validation(SettingsFields::APP_NAME, "must not be empty"));
        }
        if name.chars().count() > max_app_name_length {
            return Err(SettingsError::validation(
                SettingsFields::APP_NAME,
                format!("exceeds maximum length of {max_app_name_length}"),
            ));
        }
    }
    if let Some(color) = &patch.primary_color {
        color
            .parse::<Rgb>()
            .map_err(|e| SettingsError::validation(SettingsFields::PRIMARY_COLOR, e.to_string()))?;
    }
    Ok(())
}
