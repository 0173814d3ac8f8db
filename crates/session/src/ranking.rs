//! Selection of a user's highest and lowest rated movies.

use data_loader::RatingEvent;
use rand::Rng;
use rand::seq::index;

/// Highest possible rating score
pub const MAX_SCORE: f64 = 5.0;
/// Lowest possible rating score
pub const MIN_SCORE: f64 = 1.0;

/// Direction of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Best first; ties at `MAX_SCORE` are sampled
    Highest,
    /// Worst first; ties at `MIN_SCORE` are sampled
    Lowest,
}

impl RankOrder {
    /// The score whose ties get sampled instead of truncated
    pub fn extreme(&self) -> f64 {
        match self {
            RankOrder::Highest => MAX_SCORE,
            RankOrder::Lowest => MIN_SCORE,
        }
    }
}

/// Pick `n` of `events` in rank order
///
/// ## Algorithm
/// 1. Clamp `n` to the number of events
/// 2. Stable-sort by score in the requested direction
/// 3. If more than `n` events sit at the extreme score, sample `n` of those
///    uniformly without replacement
/// 4. Otherwise take the first `n` in sorted order
pub fn select_ranked<R: Rng + ?Sized>(
    events: &[RatingEvent],
    n: usize,
    order: RankOrder,
    rng: &mut R,
) -> Vec<RatingEvent> {
    let mut ranked = events.to_vec();
    match order {
        RankOrder::Highest => ranked.sort_by(|a, b| b.score.total_cmp(&a.score)),
        RankOrder::Lowest => ranked.sort_by(|a, b| a.score.total_cmp(&b.score)),
    }

    let n = n.min(ranked.len());
    let extreme = order.extreme();
    let tied: Vec<RatingEvent> = ranked
        .iter()
        .filter(|event| event.score == extreme)
        .copied()
        .collect();

    if tied.len() > n {
        return index::sample(rng, tied.len(), n)
            .into_iter()
            .map(|i| tied[i])
            .collect();
    }

    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn event(movie: usize, score: f64) -> RatingEvent {
        RatingEvent { user: 1, movie, score }
    }

    #[test]
    fn test_highest_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let events = vec![event(0, 2.0), event(1, 4.0), event(2, 3.0), event(3, 5.0)];

        let top = select_ranked(&events, 2, RankOrder::Highest, &mut rng);

        assert_eq!(top, vec![event(3, 5.0), event(1, 4.0)]);
    }

    #[test]
    fn test_lowest_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let events = vec![event(0, 2.0), event(1, 4.0), event(2, 1.0), event(3, 5.0)];

        let bottom = select_ranked(&events, 3, RankOrder::Lowest, &mut rng);

        assert_eq!(bottom, vec![event(2, 1.0), event(0, 2.0), event(1, 4.0)]);
    }

    #[test]
    fn test_n_clamped_to_review_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let events = vec![event(0, 3.0), event(1, 4.0)];

        assert_eq!(select_ranked(&events, 10, RankOrder::Highest, &mut rng).len(), 2);
        assert!(select_ranked(&[], 10, RankOrder::Lowest, &mut rng).is_empty());
    }

    #[test]
    fn test_ties_at_extreme_are_sampled_without_replacement() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut events: Vec<RatingEvent> = (0..20).map(|m| event(m, 5.0)).collect();
        events.push(event(20, 4.0));

        for _ in 0..50 {
            let top = select_ranked(&events, 5, RankOrder::Highest, &mut rng);
            assert_eq!(top.len(), 5);
            assert!(top.iter().all(|e| e.score == 5.0));
            let distinct: HashSet<usize> = top.iter().map(|e| e.movie).collect();
            assert_eq!(distinct.len(), 5);
        }
    }

    #[test]
    fn test_tie_sampling_varies() {
        let mut rng = StdRng::seed_from_u64(3);
        let events: Vec<RatingEvent> = (0..30).map(|m| event(m, 1.0)).collect();

        let picks: HashSet<Vec<usize>> = (0..20)
            .map(|_| {
                select_ranked(&events, 3, RankOrder::Lowest, &mut rng)
                    .iter()
                    .map(|e| e.movie)
                    .collect()
            })
            .collect();

        assert!(picks.len() > 1);
    }

    #[test]
    fn test_ties_not_at_extreme_are_truncated() {
        let mut rng = StdRng::seed_from_u64(1);
        let events = vec![event(0, 4.0), event(1, 4.0), event(2, 4.0), event(3, 2.0)];

        let top = select_ranked(&events, 2, RankOrder::Highest, &mut rng);

        // Stable sort keeps file order among equal scores
        assert_eq!(top, vec![event(0, 4.0), event(1, 4.0)]);
    }
}
