use rand::Rng;
use rand_distr::{Dirichlet, Distribution};

use crate::error::{MctsError, Result};

/// Sample `n` Dirichlet-distributed weights with symmetric concentration `alpha`
///
/// A single child gets the degenerate sample `[1.0]`.
pub fn sample_noise<R: Rng + ?Sized>(n: usize, alpha: f64, rng: &mut R) -> Result<Vec<f64>> {
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![1.0]),
        _ => {}
    }

    let alpha_vec = vec![alpha; n];
    let dirichlet =
        Dirichlet::new(&alpha_vec).map_err(|e| MctsError::DirichletError(e.to_string()))?;

    Ok(dirichlet.sample(rng))
}

/// Self-play sampling weights: `visit_weight * visits + noise_weight * noise`
///
/// Noise is only drawn when `noise_weight` is non-zero, with concentration
/// `dirichlet_scale * root_visits`.
pub fn noisy_visit_weights<R: Rng + ?Sized>(
    visits: &[u32],
    root_visits: u32,
    visit_weight: f64,
    noise_weight: f64,
    dirichlet_scale: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let noise = if noise_weight != 0.0 {
        sample_noise(visits.len(), dirichlet_scale * root_visits as f64, rng)?
    } else {
        vec![0.0; visits.len()]
    };

    Ok(visits
        .iter()
        .zip(noise)
        .map(|(&v, n)| visit_weight * v as f64 + noise_weight * n)
        .collect())
}
