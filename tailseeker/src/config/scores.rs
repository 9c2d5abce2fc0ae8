//! T-intensity score table used by the polyA ruler.

/// Number of intensity bins; the table has one more entry than this.
pub const T_INTENSITY_SCORE_BINS: usize = 1024;

/// Precomputes the logistic score of every intensity bin.
///
/// Entry `i` is `1 / (1 + exp(-k * (i / BINS - center)))`.
///
/// # Examples
///
/// ```
/// use tailseeker::config::scores::{precalc_t_intensity_scores, T_INTENSITY_SCORE_BINS};
///
/// let scores = precalc_t_intensity_scores(20.0, 0.75);
/// assert_eq!(scores.len(), T_INTENSITY_SCORE_BINS + 1);
/// assert!(scores[0] < scores[T_INTENSITY_SCORE_BINS]);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn precalc_t_intensity_scores(k: f32, center: f32) -> Vec<f32> {
    let bins = T_INTENSITY_SCORE_BINS as f32;
    (0..=T_INTENSITY_SCORE_BINS)
        .map(|i| {
            let intensity = i as f32 / bins;
            1.0 / (1.0 + (-k * (intensity - center)).exp())
        })
        .collect()
}
