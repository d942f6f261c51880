use serde::Serialize;

/// The six ordered rating buckets, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    E,
}

// Lower bound of the average score for each tier, checked top-down.
const FINAL_TIER_THRESHOLDS: [(f64, Tier); 5] = [
    (5.5, Tier::S),
    (4.5, Tier::A),
    (3.5, Tier::B),
    (2.5, Tier::C),
    (1.5, Tier::D),
];

impl Tier {
    pub const ALL: [Tier; 6] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D, Tier::E];

    /// Highest weight any vote can carry.
    pub const MAX_WEIGHT: u32 = 6;

    pub fn weight(self) -> u32 {
        match self {
            Tier::S => 6,
            Tier::A => 5,
            Tier::B => 4,
            Tier::C => 3,
            Tier::D => 2,
            Tier::E => 1,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::S => "S-Tier",
            Tier::A => "A-Tier",
            Tier::B => "B-Tier",
            Tier::C => "C-Tier",
            Tier::D => "D-Tier",
            Tier::E => "E-Tier",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::S => "Exceptional - Outstanding performance and quality",
            Tier::A => "Excellent - High quality with minor areas for improvement",
            Tier::B => "Very Good - Above average with solid performance",
            Tier::C => "Average - Meets expectations with standard quality",
            Tier::D => "Below Average - Subpar performance needing improvement",
            Tier::E => "Poor - Significant issues and poor quality",
        }
    }

    /// The part of the description after the headline word.
    pub fn summary(self) -> &'static str {
        let description = self.description();
        description
            .split_once(" - ")
            .map(|(_, rest)| rest)
            .unwrap_or(description)
    }

    pub fn color(self) -> u32 {
        match self {
            Tier::S => 0xFFD700,
            Tier::A => 0x4A90E2,
            Tier::B => 0x50C878,
            Tier::C => 0xFFA500,
            Tier::D => 0xFF6B6B,
            Tier::E => 0xDC143C,
        }
    }

    pub fn from_key(key: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.key().eq_ignore_ascii_case(key))
    }

    /// Buckets an average score into the tier whose weight it rounds to.
    /// Anything below 1.5, including the empty-poll average of 0, is E.
    pub fn from_average(average: f64) -> Tier {
        FINAL_TIER_THRESHOLDS
            .iter()
            .find(|(threshold, _)| average >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::E)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_strictly_decrease_from_s_to_e() {
        let weights: Vec<u32> = Tier::ALL.iter().map(|t| t.weight()).collect();
        assert_eq!(weights, vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(Tier::S.weight(), Tier::MAX_WEIGHT);
    }

    #[test]
    fn average_thresholds_sit_between_weights() {
        assert_eq!(Tier::from_average(6.0), Tier::S);
        assert_eq!(Tier::from_average(5.5), Tier::S);
        assert_eq!(Tier::from_average(5.49), Tier::A);
        assert_eq!(Tier::from_average(4.5), Tier::A);
        assert_eq!(Tier::from_average(13.0 / 3.0), Tier::B);
        assert_eq!(Tier::from_average(2.5), Tier::C);
        assert_eq!(Tier::from_average(1.5), Tier::D);
        assert_eq!(Tier::from_average(1.49), Tier::E);
        assert_eq!(Tier::from_average(0.0), Tier::E);
    }

    #[test]
    fn keys_round_trip_and_ignore_case() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_key(tier.key()), Some(tier));
        }
        assert_eq!(Tier::from_key("b"), Some(Tier::B));
        assert_eq!(Tier::from_key("F"), None);
        assert_eq!(Tier::from_key(""), None);
    }

    #[test]
    fn summary_drops_headline() {
        assert_eq!(Tier::C.summary(), "Meets expectations with standard quality");
    }

    #[test]
    fn serializes_as_variant_name() {
        assert_eq!(serde_json::to_string(&Tier::A).unwrap(), "\"A\"");
    }
}
