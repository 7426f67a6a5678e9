//! Session configuration.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! wheel_step = 32.0
//! gc_after_frames = 600
//!
//! [style]
//! spacing = 6.0
//! line_height = 18.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::style::Style;

/// Configuration for a UI session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Numeric style parameters and colors.
    pub style: Style,
    /// Frames a control may go undeclared before its persistent state is dropped.
    pub gc_after_frames: u64,
    /// Pixels scrolled per wheel unit.
    pub wheel_step: f32,
    /// Keyboard steps across a slider's full range.
    pub slider_key_steps: u32,
    /// Upper bound on vertices per window per frame.
    pub max_vertices: usize,
    /// Upper bound on indices per window per frame.
    pub max_indices: usize,
    /// Panic on usage errors instead of repairing them.
    pub panic_on_misuse: bool,
    /// Number boxes reject keystrokes that leave an unparsable string.
    pub strict_numeric_input: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            gc_after_frames: 300,
            wheel_step: 24.0,
            slider_key_steps: 20,
            max_vertices: 1 << 20,
            max_indices: 3 << 19,
            panic_on_misuse: cfg!(debug_assertions),
            strict_numeric_input: false,
        }
    }
}

impl UiConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text does not parse or fails validation.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| UiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// `ConfigIo` if the file cannot be read, `InvalidConfig` if its content
    /// is rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| UiError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> UiResult<String> {
        toml::to_string(self).map_err(|e| UiError::InvalidConfig(e.to_string()))
    }

    /// Checks metrics and limits.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> UiResult<()> {
        let style = &self.style;
        let metrics = [
            ("style.padding", style.padding),
            ("style.container_padding", style.container_padding),
            ("style.spacing", style.spacing),
            ("style.line_height", style.line_height),
            ("style.scrollbar_width", style.scrollbar_width),
            ("style.check_size", style.check_size),
            ("style.slider_width", style.slider_width),
            ("style.slider_thumb_width", style.slider_thumb_width),
            ("style.text_box_width", style.text_box_width),
            ("style.cursor_width", style.cursor_width),
            ("wheel_step", self.wheel_step),
        ];
        for (name, value) in metrics {
            if !value.is_finite() || value < 0.0 {
                return Err(UiError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.max_vertices < 4 || self.max_indices < 6 {
            return Err(UiError::InvalidConfig(
                "max_vertices/max_indices must fit at least one quad".into(),
            ));
        }
        if u32::try_from(self.max_vertices).is_err() || u32::try_from(self.max_indices).is_err() {
            return Err(UiError::InvalidConfig(
                "max_vertices/max_indices must fit in 32-bit indices".into(),
            ));
        }
        if self.slider_key_steps == 0 {
            return Err(UiError::InvalidConfig(
                "slider_key_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
