//! Rank ladder
//!
//! Maps a score onto the familiar competitive-tier ladder for display
//! next to the scoreboard. Pure lookup, no state.

/// A ladder tier and the score needed to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rank {
    /// Display name of the tier.
    pub name: &'static str,
    /// Minimum score for this tier.
    pub threshold: u32,
}

/// The ladder, lowest tier first. Thresholds are strictly increasing.
pub const RANKS: [Rank; 10] = [
    Rank { name: "Iron", threshold: 0 },
    Rank { name: "Bronze", threshold: 5 },
    Rank { name: "Silver", threshold: 10 },
    Rank { name: "Gold", threshold: 20 },
    Rank { name: "Platinum", threshold: 35 },
    Rank { name: "Emerald", threshold: 50 },
    Rank { name: "Diamond", threshold: 70 },
    Rank { name: "Master", threshold: 100 },
    Rank { name: "Grandmaster", threshold: 150 },
    Rank { name: "Challenger", threshold: 200 },
];

/// The highest tier whose threshold `score` meets.
pub fn rank_for(score: u32) -> Rank {
    let mut current = RANKS[0];
    for rank in RANKS.iter() {
        if score >= rank.threshold {
            current = *rank;
        }
    }
    current
}

impl Rank {
    /// URL of the tier's emblem on the community asset CDN.
    pub fn emblem_url(&self) -> String {
        format!(
            "https://raw.communitydragon.org/latest/plugins/rcp-fe-lol-static-assets/global/default/images/ranked-emblem/emblem-{}.png",
            self.name.to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_strictly_increase() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].threshold < pair[1].threshold);
        }
    }

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(rank_for(0).name, "Iron");
        assert_eq!(rank_for(4).name, "Iron");
        assert_eq!(rank_for(5).name, "Bronze");
        assert_eq!(rank_for(19).name, "Silver");
        assert_eq!(rank_for(20).name, "Gold");
        assert_eq!(rank_for(199).name, "Grandmaster");
        assert_eq!(rank_for(200).name, "Challenger");
        assert_eq!(rank_for(9999).name, "Challenger");
    }

    #[test]
    fn test_emblem_url_uses_lowercase_tier() {
        let url = rank_for(35).emblem_url();
        assert!(url.ends_with("emblem-platinum.png"));
    }
}
