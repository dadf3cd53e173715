pub struct SettingsFields;

impl SettingsFields {
    pub const APP_NAME: &'static str = "appName";
    pub const LOGO: &'static str = "logo";
    pub const PRIMARY_COLOR: &'static str = "primaryColor";
    pub const BUTTON_RADIUS: &'static str = "buttonRadius";
    pub const PRIMARY_BUTTON_STYLE: &'static str = "primaryButtonStyle";
}
