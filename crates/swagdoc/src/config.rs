use serde::{Deserialize, Serialize};

/// Default location of the Swagger UI assets
pub const DEFAULT_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/swagger-ui/4.11.1";

/// File name of the spec endpoint, relative to the documentation path
pub const SPEC_NAME: &str = "swagger.json";

/// Title used when no `Info` is supplied
pub const DEFAULT_TITLE: &str = "Project APIs";

/// Settings of the documentation UI page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSetting {
    /// Load the spec from the spec endpoint instead of inlining it
    #[serde(default)]
    pub detach_spec: bool,

    /// Hide the top bar of the UI. Only honored for a detached spec; the
    /// inlined page always hides it.
    #[serde(default)]
    pub hide_top: bool,

    /// Base URL of the Swagger UI assets
    #[serde(default = "default_cdn")]
    pub cdn: String,
}

fn default_cdn() -> String {
    DEFAULT_CDN.to_string()
}

impl Default for UiSetting {
    fn default() -> Self {
        Self {
            detach_spec: false,
            hide_top: false,
            cdn: default_cdn(),
        }
    }
}

impl UiSetting {
    pub fn with_detach_spec(mut self, detach: bool) -> Self {
        self.detach_spec = detach;
        self
    }

    pub fn with_hide_top(mut self, hide: bool) -> Self {
        self.hide_top = hide;
        self
    }

    /// Use a different asset location. An empty value keeps the default.
    pub fn with_cdn(mut self, cdn: &str) -> Self {
        self.cdn = if cdn.is_empty() {
            default_cdn()
        } else {
            cdn.to_string()
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setting() {
        let setting = UiSetting::default();
        assert!(!setting.detach_spec);
        assert!(!setting.hide_top);
        assert_eq!(setting.cdn, DEFAULT_CDN);
    }

    #[test]
    fn test_builder_methods() {
        let setting = UiSetting::default()
            .with_detach_spec(true)
            .with_hide_top(true)
            .with_cdn("https://cdn.example.com/swagger-ui");
        assert!(setting.detach_spec);
        assert!(setting.hide_top);
        assert_eq!(setting.cdn, "https://cdn.example.com/swagger-ui");
        assert_eq!(UiSetting::default().with_cdn("").cdn, DEFAULT_CDN);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let setting: UiSetting = serde_json::from_str(r#"{"hide_top": true}"#).unwrap();
        assert!(setting.hide_top);
        assert_eq!(setting.cdn, DEFAULT_CDN);
    }
}
