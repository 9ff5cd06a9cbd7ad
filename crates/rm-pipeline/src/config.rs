/// Fixed pipeline parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Vertical sampling stride: image rows per grid row.
    pub step_x: usize,
    /// Horizontal sampling stride: image columns per grid column.
    pub step_y: usize,
    /// Threshold on mean channel intensity; at or below counts as occupied.
    pub sigma: u8,
    /// Canvas width; sources wider than this are rescaled.
    pub max_width: usize,
    /// Canvas height; sources taller than this are rescaled.
    pub max_height: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_x: 8,
            step_y: 8,
            sigma: 200,
            max_width: 2048,
            max_height: 2048,
        }
    }
}

impl PipelineConfig {
    pub fn needs_rescale(&self, width: usize, height: usize) -> bool {
        width > self.max_width || height > self.max_height
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineConfig;

    #[test]
    fn rescale_triggers_when_either_dimension_exceeds_the_limit() {
        let cfg = PipelineConfig::default();
        assert!(!cfg.needs_rescale(2048, 2048));
        assert!(cfg.needs_rescale(2049, 16));
        assert!(cfg.needs_rescale(16, 2049));
        assert!(cfg.needs_rescale(4096, 2048));
    }
}
