use crate::algorithm::catalog::MaterialImage;
use crate::spatial::grid::GridPosition;

// Candidate ranking weights
/// Share of the total score taken by color accuracy
pub const COLOR_WEIGHT: f64 = 0.6;
/// Share of the total score taken by diversity
pub const DIVERSITY_WEIGHT: f64 = 0.4;
/// Color distances beyond `tolerance * TOLERANCE_SCALE` score zero
pub const TOLERANCE_SCALE: f64 = 1.5;

// Diversity terms
/// Penalty per previous use in the current pass
pub const USAGE_PENALTY: f64 = 10.0;
/// Reward per grid unit of distance from the last use, once far enough away
pub const DISTANCE_REWARD: f64 = 5.0;
/// Penalty per grid unit the last use falls short of the minimum distance
pub const PROXIMITY_PENALTY: f64 = 15.0;
/// Flat bonus for materials not yet used in the current pass
pub const UNUSED_BONUS: f64 = 20.0;
/// Reward per unit of color variance
pub const VARIANCE_WEIGHT: f64 = 0.1;

// Candidate scan bounds
/// Candidates scanned per cell regardless of catalog size
pub const MIN_SEARCH_LIMIT: usize = 20;
/// The scan also covers one tenth of the catalog when that is larger
pub const SEARCH_LIMIT_DIVISOR: f64 = 10.0;

/// Color accuracy score; higher is better, zero beyond the tolerance threshold
pub fn color_score(distance: f64, tolerance: f64) -> f64 {
    TOLERANCE_SCALE.mul_add(tolerance, -distance).max(0.0)
}

/// Distance under which reusing a material is penalized
pub fn min_reuse_distance(grid_size: u32) -> f64 {
    (f64::from(grid_size) / 20.0).max(3.0)
}

/// Diversity score of placing `material` at `position`
///
/// Penalizes frequent use and nearby reuse, rewards spread and colorful
/// images.
pub fn diversity_score(material: &MaterialImage, position: GridPosition, min_distance: f64) -> f64 {
    let mut score = -f64::from(material.usage_count) * USAGE_PENALTY;

    match material.last_used {
        Some(last) => {
            let distance = position.distance(last);
            if distance >= min_distance {
                score += distance * DISTANCE_REWARD;
            } else {
                score -= (min_distance - distance) * PROXIMITY_PENALTY;
            }
        }
        None => score += UNUSED_BONUS,
    }

    score + material.variance() * VARIANCE_WEIGHT
}

/// Weighted combination of color and diversity scores
pub fn total_score(color: f64, diversity: f64) -> f64 {
    color.mul_add(COLOR_WEIGHT, diversity * DIVERSITY_WEIGHT)
}

/// Number of candidates scanned out of `candidate_count`
///
/// The bound is `max(20, total / 10)` compared against the scan index, so a
/// fractional bound admits one more candidate.
pub fn search_limit(candidate_count: usize, total_materials: usize) -> usize {
    let bound = (total_materials as f64 / SEARCH_LIMIT_DIVISOR)
        .max(MIN_SEARCH_LIMIT as f64)
        .ceil() as usize;
    candidate_count.min(bound)
}
