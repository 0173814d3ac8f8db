//! Candidate pool for recommendations.
//!
//! The pool is a uniform sample of catalog positions the user has not rated.
//! Ranking happens afterwards, on the model's predicted ratings.

use data_loader::MovieIndex;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Number of unseen movies scored per recommendation request
pub const CANDIDATE_POOL_SIZE: usize = 100;

/// Draw up to `pool_size` distinct catalog positions not contained in `seen`
///
/// ## Algorithm
/// - If no more than `pool_size` movies are unseen, return all of them
/// - Otherwise draw uniformly from `0..catalog_size`, discarding seen movies and
///   duplicates, until the pool is full
pub fn draw_candidate_pool<R: Rng + ?Sized>(
    rng: &mut R,
    catalog_size: usize,
    seen: &HashSet<MovieIndex>,
    pool_size: usize,
) -> Vec<MovieIndex> {
    let seen_in_catalog = seen.iter().filter(|&&movie| movie < catalog_size).count();
    let unseen = catalog_size - seen_in_catalog;

    if unseen <= pool_size {
        debug!("Only {} unseen movies, using all of them", unseen);
        return (0..catalog_size)
            .filter(|movie| !seen.contains(movie))
            .collect();
    }

    let mut pool = Vec::with_capacity(pool_size);
    let mut in_pool = HashSet::with_capacity(pool_size);
    let mut draws = 0usize;

    while pool.len() < pool_size {
        let movie = rng.random_range(0..catalog_size);
        draws += 1;
        if !seen.contains(&movie) && in_pool.insert(movie) {
            pool.push(movie);
        }
    }

    debug!("Drew {} candidates in {} draws", pool.len(), draws);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pool_excludes_seen_and_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<MovieIndex> = (0..150).collect();

        let pool = draw_candidate_pool(&mut rng, 300, &seen, CANDIDATE_POOL_SIZE);

        assert_eq!(pool.len(), CANDIDATE_POOL_SIZE);
        assert!(pool.iter().all(|m| !seen.contains(m) && *m < 300));
        let distinct: HashSet<_> = pool.iter().collect();
        assert_eq!(distinct.len(), pool.len());
    }

    #[test]
    fn test_pool_exhausts_small_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<MovieIndex> = [1, 3].into_iter().collect();

        let pool = draw_candidate_pool(&mut rng, 6, &seen, CANDIDATE_POOL_SIZE);

        assert_eq!(pool, vec![0, 2, 4, 5]);
    }

    #[test]
    fn test_seen_outside_catalog_is_ignored() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<MovieIndex> = [0, 1_000].into_iter().collect();

        let pool = draw_candidate_pool(&mut rng, 3, &seen, CANDIDATE_POOL_SIZE);

        assert_eq!(pool, vec![1, 2]);
    }

    #[test]
    fn test_everything_seen() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<MovieIndex> = (0..4).collect();

        assert!(draw_candidate_pool(&mut rng, 4, &seen, CANDIDATE_POOL_SIZE).is_empty());
    }
}
