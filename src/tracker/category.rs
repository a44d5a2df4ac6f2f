use super::models::MatchCategory;

/// Game-mode fragments that mark event and arcade playlists
const ARCADE_KEYWORDS: &[&str] = &[
    "war",
    "zombie",
    "training",
    "tdm",
    "deathmatch",
    "conquest",
    "intense",
    "esports",
    "event",
    "lab",
    "arcade",
    "ibr",
    "battleroyal",
];

const NORMAL_MODES: &[&str] = &["solo", "solo-fpp", "duo", "duo-fpp", "squad", "squad-fpp"];

/// Classifies a match. Checks run in a fixed order; the first hit wins:
/// custom, ranked/competitive, airoyale, arcade keyword, normal mode.
pub fn determine_category(game_mode: &str, match_type: &str, is_custom: bool) -> MatchCategory {
    if is_custom {
        return MatchCategory::Custom;
    }

    let mode = game_mode.to_lowercase();
    let kind = match_type.to_lowercase();

    if kind.contains("competitive") || kind.contains("ranked") {
        return MatchCategory::Ranked;
    }

    if kind.contains("airoyale") {
        return MatchCategory::Casual;
    }

    if ARCADE_KEYWORDS.iter().any(|keyword| mode.contains(keyword)) {
        return MatchCategory::Arcade;
    }

    if NORMAL_MODES.contains(&mode.as_str()) {
        return match kind.as_str() {
            "official" | "seasonal" => MatchCategory::Normal,
            _ => MatchCategory::Arcade,
        };
    }

    MatchCategory::Unknown(game_mode.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("solo", "official", false, MatchCategory::Normal)]
    #[case("squad-fpp", "seasonal", false, MatchCategory::Normal)]
    #[case("Duo-FPP", "Official", false, MatchCategory::Normal)]
    #[case("squad", "official", true, MatchCategory::Custom)]
    #[case("zombie", "airoyale", true, MatchCategory::Custom)]
    #[case("squad-fpp", "competitive", false, MatchCategory::Ranked)]
    #[case("squad", "Ranked", false, MatchCategory::Ranked)]
    #[case("squad", "airoyale", false, MatchCategory::Casual)]
    #[case("tdm", "airoyale", false, MatchCategory::Casual)] // airoyale outranks arcade keywords
    #[case("team-deathmatch", "official", false, MatchCategory::Arcade)]
    #[case("war-fpp", "official", false, MatchCategory::Arcade)]
    #[case("ibr", "official", false, MatchCategory::Arcade)]
    #[case("squad", "custom", false, MatchCategory::Arcade)] // normal mode, unofficial type
    #[case("normal-squad", "official", false, MatchCategory::Unknown("normal-squad".to_string()))]
    fn test_determine_category(
        #[case] game_mode: &str,
        #[case] match_type: &str,
        #[case] is_custom: bool,
        #[case] expected: MatchCategory,
    ) {
        assert_eq!(determine_category(game_mode, match_type, is_custom), expected);
    }

    #[test]
    fn test_unknown_keeps_raw_mode() {
        let category = determine_category("Mystery-Mode", "official", false);
        assert_eq!(category.to_string(), "UNKNOWN (Mystery-Mode)");
    }
}
