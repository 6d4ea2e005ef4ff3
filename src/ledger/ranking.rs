//! Ranking and winner selection over a totals snapshot

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use super::model::{ChooseBy, Standing};

/// Direction of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Highest totals first
    Top,
    /// Lowest totals first
    Bottom,
}

impl std::str::FromStr for RankOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "top" => Ok(RankOrder::Top),
            "bottom" => Ok(RankOrder::Bottom),
            other => Err(format!("expected 'top' or 'bottom', got '{other}'")),
        }
    }
}

/// Order totals by value and keep at most `limit` entries
///
/// Ties are broken by user handle ascending in both directions.
pub fn rank_totals(totals: &BTreeMap<String, i64>, order: RankOrder, limit: usize) -> Vec<Standing> {
    // BTreeMap iterates by handle, and sort_by_key is stable
    let mut standings: Vec<(&String, i64)> = totals.iter().map(|(u, p)| (u, *p)).collect();

    match order {
        RankOrder::Top => standings.sort_by_key(|&(_, points)| Reverse(points)),
        RankOrder::Bottom => standings.sort_by_key(|&(_, points)| points),
    }

    standings
        .into_iter()
        .take(limit)
        .map(|(user, points)| Standing::new(user.clone(), points))
        .collect()
}

/// Users sharing the extremal total selected by `choose_by`
pub fn tie_set(totals: &BTreeMap<String, i64>, choose_by: ChooseBy) -> Vec<Standing> {
    let extremum = match choose_by {
        ChooseBy::Min => totals.values().min(),
        ChooseBy::Max => totals.values().max(),
    };

    let Some(&target) = extremum else {
        return Vec::new();
    };

    totals
        .iter()
        .filter(|&(_, &points)| points == target)
        .map(|(user, &points)| Standing::new(user.clone(), points))
        .collect()
}

/// Pick one member of the tie set uniformly at random
///
/// Returns `None` when `totals` is empty.
pub fn pick_winner<R: Rng + ?Sized>(
    totals: &BTreeMap<String, i64>,
    choose_by: ChooseBy,
    rng: &mut R,
) -> Option<Standing> {
    tie_set(totals, choose_by).choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn totals(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries
            .iter()
            .map(|(user, points)| (user.to_string(), *points))
            .collect()
    }

    #[test]
    fn test_rank_top_and_bottom() {
        let totals = totals(&[("a", 5), ("b", 3), ("c", 8)]);

        assert_eq!(
            rank_totals(&totals, RankOrder::Top, 2),
            vec![Standing::new("c", 8), Standing::new("a", 5)]
        );
        assert_eq!(
            rank_totals(&totals, RankOrder::Bottom, 1),
            vec![Standing::new("b", 3)]
        );
    }

    #[test]
    fn test_rank_limit_larger_than_users() {
        let totals = totals(&[("a", 1), ("b", 2)]);
        assert_eq!(rank_totals(&totals, RankOrder::Top, 10).len(), 2);
        assert!(rank_totals(&totals, RankOrder::Top, 0).is_empty());
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_totals(&BTreeMap::new(), RankOrder::Bottom, 3).is_empty());
    }

    #[test]
    fn test_rank_ties_break_by_handle() {
        let totals = totals(&[("zed", 4), ("amy", 4), ("kim", 4), ("bob", 9)]);

        let users = |order| -> Vec<String> {
            rank_totals(&totals, order, 10)
                .into_iter()
                .map(|s| s.user)
                .collect()
        };

        assert_eq!(users(RankOrder::Top), vec!["bob", "amy", "kim", "zed"]);
        assert_eq!(users(RankOrder::Bottom), vec!["amy", "kim", "zed", "bob"]);
    }

    #[test]
    fn test_tie_set() {
        let totals = totals(&[("a", 2), ("b", 2), ("c", 5)]);

        let min: Vec<_> = tie_set(&totals, ChooseBy::Min).into_iter().map(|s| s.user).collect();
        assert_eq!(min, vec!["a", "b"]);

        let max = tie_set(&totals, ChooseBy::Max);
        assert_eq!(max, vec![Standing::new("c", 5)]);

        assert!(tie_set(&BTreeMap::new(), ChooseBy::Max).is_empty());
    }

    #[test]
    fn test_pick_winner_is_fair_among_ties() {
        let totals = totals(&[("a", 2), ("b", 2), ("c", 5)]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();

        for _ in 0..2000 {
            let winner = pick_winner(&totals, ChooseBy::Min, &mut rng).unwrap();
            *counts.entry(winner.user).or_default() += 1;
        }

        assert!(!counts.contains_key("c"));
        // Expected 1000 each; allow a wide margin
        assert!(counts["a"] > 800, "a picked {} times", counts["a"]);
        assert!(counts["b"] > 800, "b picked {} times", counts["b"]);
    }

    #[test]
    fn test_pick_winner_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_winner(&BTreeMap::new(), ChooseBy::Min, &mut rng).is_none());
    }

    #[test]
    fn test_rank_order_parse() {
        assert_eq!("top".parse::<RankOrder>().unwrap(), RankOrder::Top);
        assert_eq!("bottom".parse::<RankOrder>().unwrap(), RankOrder::Bottom);
        assert!("middle".parse::<RankOrder>().is_err());
    }
}
