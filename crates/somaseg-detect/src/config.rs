use serde::{Deserialize, Serialize};
use somaseg_snakes::AutoConvergeCriteria;

/// How many iterations the region snake runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iterations {
    /// Run exactly this number of steps.
    Fixed(usize),
    /// Run until the foreground count stabilises.
    #[default]
    AutoConverge,
}

/// Parameters of the soma detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SomaDetectConfig {
    /// Number of curvature operator applications per step.
    pub smoothing: usize,
    /// Weight of the inside region term.
    pub lambda1: f32,
    /// Weight of the outside region term.
    pub lambda2: f32,
    /// Iteration policy of the snake.
    pub iterations: Iterations,
    /// Criteria used when `iterations` is [`Iterations::AutoConverge`].
    pub convergence: AutoConvergeCriteria,
    /// Value written to the soma voxels of the output mask.
    pub soma_label: u8,
    /// Upper bound of the seed radius, as a multiple of `sqrt(radius)`.
    pub max_radius_factor: f64,
    /// Half-width of the crop, as a multiple of the seed radius.
    pub window_scale: f64,
    /// Lower bound of the seed radius, in voxels.
    pub min_seed_radius: f64,
}

impl Default for SomaDetectConfig {
    fn default() -> Self {
        Self {
            smoothing: 1,
            lambda1: 1.0,
            lambda2: 1.0,
            iterations: Iterations::AutoConverge,
            convergence: AutoConvergeCriteria::default(),
            soma_label: 40,
            max_radius_factor: 6.0,
            window_scale: 3.0,
            min_seed_radius: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SomaDetectConfig::default();
        assert_eq!(config.soma_label, 40);
        assert_eq!(config.iterations, Iterations::AutoConverge);
        assert_eq!(config.convergence.max_iterations, 200);
    }

    #[test]
    fn test_config_json() -> Result<(), serde_json::Error> {
        let config = SomaDetectConfig {
            iterations: Iterations::Fixed(50),
            smoothing: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&config)?;
        assert!(json.contains(r#""iterations":{"fixed":50}"#));
        assert_eq!(serde_json::from_str::<SomaDetectConfig>(&json)?, config);

        let partial: SomaDetectConfig =
            serde_json::from_str(r#"{"lambda2": 2.0, "iterations": "auto_converge"}"#)?;
        assert_eq!(partial.lambda2, 2.0);
        assert_eq!(partial.iterations, Iterations::AutoConverge);
        assert_eq!(partial.soma_label, 40);

        let seeded: SomaDetectConfig = serde_json::from_str(r#"{"min_seed_radius": 4.5}"#)?;
        assert_eq!(seeded.min_seed_radius, 4.5);
        Ok(())
    }
}
