use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for the editor. Missing JSON keys fall back to the defaults.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Distance from the pointer at which the stroke eraser removes a path.
    pub stroke_erase_threshold: f64,
    /// Radius of the area eraser disc.
    pub area_erase_radius: f64,
    /// Per-frame scale factor clamp for the resize handle.
    pub min_scale_step: f64,
    pub max_scale_step: f64,
    pub rotate_nudge_degrees: f64,
    pub scale_nudge_up: f64,
    pub scale_nudge_down: f64,
    /// Oldest snapshots are dropped past this many entries.
    pub history_limit: usize,
    pub handle_size: f64,
    pub rotate_handle_offset: f64,
    /// Lassos enclosing less area than this are ignored.
    pub min_lasso_area: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stroke_erase_threshold: 8.0,
            area_erase_radius: 12.0,
            min_scale_step: 0.2,
            max_scale_step: 5.0,
            rotate_nudge_degrees: 5.0,
            scale_nudge_up: 1.1,
            scale_nudge_down: 0.9,
            history_limit: 200,
            handle_size: 10.0,
            rotate_handle_offset: 24.0,
            min_lasso_area: 1.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("strokeEraseThreshold", self.stroke_erase_threshold)?;
        positive("areaEraseRadius", self.area_erase_radius)?;
        positive("minScaleStep", self.min_scale_step)?;
        positive("maxScaleStep", self.max_scale_step)?;
        positive("scaleNudgeUp", self.scale_nudge_up)?;
        positive("scaleNudgeDown", self.scale_nudge_down)?;
        positive("handleSize", self.handle_size)?;
        if self.min_scale_step > self.max_scale_step {
            return Err(ConfigError::Invalid {
                field: "minScaleStep",
                reason: format!(
                    "must not exceed maxScaleStep ({} > {})",
                    self.min_scale_step, self.max_scale_step
                ),
            });
        }
        if !self.rotate_nudge_degrees.is_finite() {
            return Err(ConfigError::Invalid {
                field: "rotateNudgeDegrees",
                reason: "must be finite".to_string(),
            });
        }
        if !self.rotate_handle_offset.is_finite() || !self.min_lasso_area.is_finite() {
            return Err(ConfigError::Invalid {
                field: "rotateHandleOffset",
                reason: "offsets and areas must be finite".to_string(),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "historyLimit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn clamp_scale_step(&self, factor: f64) -> f64 {
        factor.clamp(self.min_scale_step, self.max_scale_step)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("must be a positive number, got {value}"),
    })
}
