use std::time::Duration;

/// Configuration for the prior-guided search
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of select/expand/evaluate/backup iterations
    pub num_simulations: u32,

    /// PUCT exploration constant
    pub c_puct: f32,

    /// Sample the returned move from noisy visit weights instead of taking the most visited
    pub self_play: bool,

    /// Weight of the raw visit count in self-play sampling
    pub visit_weight: f64,

    /// Weight of the Dirichlet noise in self-play sampling
    pub noise_weight: f64,

    /// Dirichlet concentration per root visit (alpha = scale * root visits)
    pub dirichlet_scale: f64,

    /// Seed for players that own their RNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl MctsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of simulations
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Set PUCT exploration constant
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Switch between competitive (argmax) and self-play (sampled) move selection
    pub fn with_self_play(mut self, enabled: bool) -> Self {
        self.self_play = enabled;
        self
    }

    /// Set the visit/noise mixing weights used when sampling self-play moves
    pub fn with_noise_mix(mut self, visit_weight: f64, noise_weight: f64) -> Self {
        self.visit_weight = visit_weight;
        self.noise_weight = noise_weight;
        self
    }

    /// Set the per-visit Dirichlet concentration
    pub fn with_dirichlet_scale(mut self, scale: f64) -> Self {
        self.dirichlet_scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 400,
            c_puct: std::f32::consts::FRAC_1_SQRT_2,
            self_play: false,
            visit_weight: 0.75,
            noise_weight: 0.25,
            dirichlet_scale: 0.3,
            seed: None,
        }
    }
}

/// Configuration for the time-boxed UCT search
#[derive(Debug, Clone)]
pub struct UctConfig {
    /// Wall-clock budget per decision
    pub time_budget: Duration,

    /// UCT exploration coefficient (K)
    pub exploration: f64,

    /// Probability of picking a random child at the root during selection
    pub epsilon: f64,

    /// Per-level decay applied to epsilon while descending
    pub gamma: f64,

    /// Seed for players that own their RNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl UctConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_exploration(mut self, k: f64) -> Self {
        self.exploration = k;
        self
    }

    /// Set initial epsilon and its per-level decay
    pub fn with_epsilon(mut self, epsilon: f64, gamma: f64) -> Self {
        self.epsilon = epsilon;
        self.gamma = gamma;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(3),
            exploration: 2.0,
            epsilon: 0.3,
            gamma: 0.999,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 400);
        assert!((config.c_puct - 1.0 / 2f32.sqrt()).abs() < 1e-6);
        assert!(!config.self_play);
        assert_eq!(config.visit_weight, 0.75);
        assert_eq!(config.noise_weight, 0.25);
        assert_eq!(config.dirichlet_scale, 0.3);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(1000)
            .with_c_puct(2.0)
            .with_self_play(true)
            .with_noise_mix(1.0, 0.0)
            .with_dirichlet_scale(0.5)
            .with_seed(9);

        assert_eq!(config.num_simulations, 1000);
        assert_eq!(config.c_puct, 2.0);
        assert!(config.self_play);
        assert_eq!(config.visit_weight, 1.0);
        assert_eq!(config.noise_weight, 0.0);
        assert_eq!(config.dirichlet_scale, 0.5);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_default_uct_config() {
        let config = UctConfig::default();
        assert_eq!(config.time_budget, Duration::from_secs(3));
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.epsilon, 0.3);
        assert_eq!(config.gamma, 0.999);
    }

    #[test]
    fn test_uct_builder_pattern() {
        let config = UctConfig::default()
            .with_time_budget(Duration::from_millis(50))
            .with_exploration(1.0)
            .with_epsilon(0.0, 1.0)
            .with_seed(3);

        assert_eq!(config.time_budget, Duration::from_millis(50));
        assert_eq!(config.exploration, 1.0);
        assert_eq!(config.epsilon, 0.0);
        assert_eq!(config.gamma, 1.0);
        assert_eq!(config.seed, Some(3));
    }
}
