use crate::models::{Poll, Tier};
use serde::Serialize;

/// Voters tied at the highest (or lowest) weight cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremalVoters {
    pub tier: Tier,
    pub voters: Vec<String>,
}

// Final tally of a finished poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierResults {
    pub counts: Vec<(Tier, usize)>, // every tier in catalog order, including zeroes
    pub total_votes: usize,
    pub total_weight: u32,
    pub average_score: f64,
    pub final_tier: Tier,
    pub highest: Option<ExtremalVoters>,
    pub lowest: Option<ExtremalVoters>,
}

impl TierResults {
    pub fn count(&self, tier: Tier) -> usize {
        self.counts
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Share of the vote a tier received, as a percentage. None when nobody voted.
    pub fn percentage(&self, tier: Tier) -> Option<f64> {
        if self.total_votes == 0 {
            return None;
        }
        Some(self.count(tier) as f64 / self.total_votes as f64 * 100.0)
    }
}

pub fn calculate_results(poll: &Poll) -> TierResults {
    let mut counts: Vec<(Tier, usize)> = Tier::ALL.iter().map(|tier| (*tier, 0)).collect();
    let mut total_votes = 0usize;
    let mut total_weight = 0u32;

    // (weight, voters) at the current extremes. The min side starts above any
    // real weight so the first vote always claims it.
    let mut highest: (u32, Vec<&str>) = (0, Vec::new());
    let mut lowest: (u32, Vec<&str>) = (Tier::MAX_WEIGHT + 1, Vec::new());

    for (voter_id, tier) in &poll.votes {
        let weight = tier.weight();

        if let Some((_, count)) = counts.iter_mut().find(|(t, _)| t == tier) {
            *count += 1;
        }
        total_votes += 1;
        total_weight += weight;

        if weight > highest.0 {
            highest = (weight, vec![voter_id.as_str()]);
        } else if weight == highest.0 {
            highest.1.push(voter_id.as_str());
        }

        if weight < lowest.0 {
            lowest = (weight, vec![voter_id.as_str()]);
        } else if weight == lowest.0 {
            lowest.1.push(voter_id.as_str());
        }
    }

    let average_score = if total_votes > 0 {
        total_weight as f64 / total_votes as f64
    } else {
        0.0
    };

    TierResults {
        counts,
        total_votes,
        total_weight,
        average_score,
        final_tier: Tier::from_average(average_score),
        highest: extremal(highest),
        lowest: extremal(lowest),
    }
}

fn extremal((weight, mut voters): (u32, Vec<&str>)) -> Option<ExtremalVoters> {
    if voters.is_empty() {
        return None;
    }
    // HashMap order is arbitrary; keep the published list stable.
    voters.sort_unstable();
    let tier = Tier::ALL.into_iter().find(|tier| tier.weight() == weight)?;
    Some(ExtremalVoters {
        tier,
        voters: voters.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollDuration;

    fn poll_with(votes: &[(&str, Tier)]) -> Poll {
        let mut poll = Poll::new(
            None,
            "c1".to_string(),
            "owner".to_string(),
            "Owner".to_string(),
            "Pineapple on pizza".to_string(),
            PollDuration::parse("1m").unwrap(),
        );
        for (voter, tier) in votes {
            poll.record_vote(voter, *tier);
        }
        poll
    }

    #[test]
    fn empty_poll_defaults_to_worst_tier() {
        let results = calculate_results(&poll_with(&[]));

        assert_eq!(results.total_votes, 0);
        assert_eq!(results.total_weight, 0);
        assert_eq!(results.average_score, 0.0);
        assert_eq!(results.final_tier, Tier::E);
        assert_eq!(results.highest, None);
        assert_eq!(results.lowest, None);
        assert_eq!(results.percentage(Tier::S), None);
        assert!(results.counts.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn mixed_votes_average_into_b_with_extremes() {
        let results = calculate_results(&poll_with(&[
            ("u1", Tier::S),
            ("u2", Tier::S),
            ("u3", Tier::E),
        ]));

        assert_eq!(results.total_votes, 3);
        assert_eq!(results.total_weight, 13);
        assert!((results.average_score - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(results.final_tier, Tier::B);
        assert_eq!(
            results.highest,
            Some(ExtremalVoters {
                tier: Tier::S,
                voters: vec!["u1".to_string(), "u2".to_string()],
            })
        );
        assert_eq!(
            results.lowest,
            Some(ExtremalVoters {
                tier: Tier::E,
                voters: vec!["u3".to_string()],
            })
        );
    }

    #[test]
    fn counts_and_percentages_per_tier() {
        let results = calculate_results(&poll_with(&[
            ("a", Tier::A),
            ("b", Tier::A),
            ("c", Tier::C),
            ("d", Tier::D),
        ]));

        assert_eq!(results.count(Tier::A), 2);
        assert_eq!(results.count(Tier::C), 1);
        assert_eq!(results.count(Tier::S), 0);
        assert_eq!(results.percentage(Tier::A), Some(50.0));
        assert_eq!(results.percentage(Tier::D), Some(25.0));
        assert_eq!(results.percentage(Tier::E), Some(0.0));
        assert_eq!(
            results.counts.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            Tier::ALL.to_vec()
        );
    }

    #[test]
    fn single_voter_is_both_highest_and_lowest() {
        let results = calculate_results(&poll_with(&[("solo", Tier::C)]));

        assert_eq!(results.final_tier, Tier::C);
        let highest = results.highest.unwrap();
        let lowest = results.lowest.unwrap();
        assert_eq!(highest.tier, Tier::C);
        assert_eq!(lowest.tier, Tier::C);
        assert_eq!(highest.voters, vec!["solo".to_string()]);
        assert_eq!(lowest.voters, vec!["solo".to_string()]);
    }

    #[test]
    fn unanimous_ties_keep_every_voter() {
        let results = calculate_results(&poll_with(&[
            ("z", Tier::D),
            ("y", Tier::D),
            ("x", Tier::D),
        ]));

        assert_eq!(results.final_tier, Tier::D);
        assert_eq!(results.highest.unwrap().voters, vec!["x", "y", "z"]);
        assert_eq!(results.lowest.unwrap().voters, vec!["x", "y", "z"]);
    }

    #[test]
    fn revote_changes_the_tally() {
        let mut poll = poll_with(&[("u1", Tier::E)]);
        poll.record_vote("u1", Tier::S);
        let results = calculate_results(&poll);

        assert_eq!(results.total_votes, 1);
        assert_eq!(results.final_tier, Tier::S);
        assert_eq!(results.count(Tier::E), 0);
    }

    #[test]
    fn boundary_average_lands_in_higher_tier() {
        // (6 + 5) / 2 = 5.5
        let results = calculate_results(&poll_with(&[("a", Tier::S), ("b", Tier::A)]));
        assert_eq!(results.average_score, 5.5);
        assert_eq!(results.final_tier, Tier::S);
    }
}
