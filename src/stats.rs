use crate::session::MAX_GUESSES;
use crate::store::{load_json, save_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const STATS_KEY: &str = "wordelish-stats";

/// Aggregate results across every round played
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Bucket `i` counts games won on guess `i + 1`
    pub guess_distribution: [u32; MAX_GUESSES],
}

impl Statistics {
    /// Fold one finished round into the totals.
    ///
    /// `guess_count` is clamped into `1..=MAX_GUESSES` so every win lands in a bucket.
    pub fn record_result(&mut self, won: bool, guess_count: usize) -> &Self {
        self.games_played += 1;

        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
            let bucket = guess_count.clamp(1, MAX_GUESSES) - 1;
            self.guess_distribution[bucket] += 1;
        } else {
            self.games_lost += 1;
            self.current_streak = 0;
        }

        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Share of games won, as a rounded percentage
    pub fn win_percentage(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        ((self.games_won as f64 / self.games_played as f64) * 100.0).round() as u32
    }
}

/// Statistics plus the storage they are persisted to after every change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsAggregator {
    stats: Statistics,
}

impl StatisticsAggregator {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let stats: Statistics = load_json(store, STATS_KEY).unwrap_or_default();
        debug!(played = stats.games_played, "loaded statistics");
        Self { stats }
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn record_result(
        &mut self,
        store: &dyn KeyValueStore,
        won: bool,
        guess_count: usize,
    ) -> &Statistics {
        self.stats.record_result(won, guess_count);
        save_json(store, STATS_KEY, &self.stats);
        info!(
            won,
            guess_count,
            streak = self.stats.current_streak,
            "round recorded"
        );
        &self.stats
    }

    pub fn reset(&mut self, store: &dyn KeyValueStore) {
        self.stats.reset();
        save_json(store, STATS_KEY, &self.stats);
        info!("statistics reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn assert_invariants(stats: &Statistics) {
        assert_eq!(stats.games_played, stats.games_won + stats.games_lost);
        assert_eq!(stats.guess_distribution.iter().sum::<u32>(), stats.games_won);
        assert!(stats.max_streak >= stats.current_streak);
    }

    #[test]
    fn test_win_increments_exactly_one_bucket() {
        for k in 1..=MAX_GUESSES {
            let mut stats = Statistics::default();
            stats.record_result(true, k);

            for (i, &count) in stats.guess_distribution.iter().enumerate() {
                assert_eq!(count, u32::from(i == k - 1), "bucket {i} after win in {k}");
            }
            assert_eq!(stats.games_played, 1);
            assert_invariants(&stats);
        }
    }

    #[test]
    fn test_loss_resets_streak_and_skips_buckets() {
        let mut stats = Statistics::default();
        stats.record_result(true, 2);
        stats.record_result(true, 3);
        assert_eq!(stats.current_streak, 2);

        stats.record_result(false, 6);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.games_lost, 1);
        assert_eq!(stats.guess_distribution.iter().sum::<u32>(), 2);
        assert_invariants(&stats);
    }

    #[test]
    fn test_max_streak_tracks_running_max() {
        let mut stats = Statistics::default();
        for won in [true, true, true, false, true] {
            stats.record_result(won, 4);
        }
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 3);
        assert_invariants(&stats);
    }

    #[test]
    fn test_out_of_range_guess_count_is_clamped() {
        let mut stats = Statistics::default();
        stats.record_result(true, 0);
        stats.record_result(true, 9);
        assert_eq!(stats.guess_distribution[0], 1);
        assert_eq!(stats.guess_distribution[MAX_GUESSES - 1], 1);
        assert_invariants(&stats);
    }

    #[test]
    fn test_win_percentage() {
        let mut stats = Statistics::default();
        assert_eq!(stats.win_percentage(), 0);
        stats.record_result(true, 1);
        stats.record_result(true, 1);
        stats.record_result(false, 6);
        assert_eq!(stats.win_percentage(), 67);
    }

    #[test]
    fn test_reads_legacy_shape_without_games_lost() {
        let json = r#"{"gamesPlayed":10,"gamesWon":7,"currentStreak":3,"maxStreak":5,"guessDistribution":[0,1,2,2,1,1]}"#;
        let stats: Statistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.games_played, 10);
        assert_eq!(stats.games_lost, 0);
        assert_eq!(stats.win_percentage(), 70);
    }

    #[test]
    fn test_aggregator_persists_each_result() {
        let store = MemoryStore::new();
        let mut aggregator = StatisticsAggregator::load(&store);
        aggregator.record_result(&store, true, 3);

        let reloaded = StatisticsAggregator::load(&store);
        assert_eq!(reloaded.stats().games_won, 1);
        assert_eq!(reloaded.stats().guess_distribution[2], 1);

        aggregator.reset(&store);
        let reloaded = StatisticsAggregator::load(&store);
        assert_eq!(reloaded.stats(), &Statistics::default());
    }
}
