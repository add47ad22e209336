use super::domain::{Drivers, SubScore};

const DRIVER_COUNT: usize = 2;

/// Top and bottom weighted sub-scores by score.
///
/// The sort is stable, so ties keep canonical factor order. `negative` lists the
/// worst score first. Zero-weight factors never become drivers.
pub(crate) fn rank(subs: &[SubScore]) -> Drivers {
    let mut sorted: Vec<SubScore> = subs
        .iter()
        .filter(|sub| sub.weight > 0.0)
        .cloned()
        .collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let positive = sorted.iter().take(DRIVER_COUNT).cloned().collect();
    let negative = sorted.iter().rev().take(DRIVER_COUNT).cloned().collect();

    Drivers { positive, negative }
}
