use std::fmt::{self, Write};

use super::models::{Leaderboard, MatchAnnouncement, OutboundMessage, PlayerLine, WeeklyBest};

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

fn mode_display(mode: &str) -> String {
    mode.replace("-fpp", " (FPP)")
}

fn write_player(out: &mut String, line: &PlayerLine) -> fmt::Result {
    let s = &line.stats;
    writeln!(
        out,
        "{} #{} | {:.1} min | {} kills ({} hs, {:.0}%) | {:.0} dmg | {} assists | {} knocks | longest {:.0}m",
        line.name,
        s.rank,
        s.survival_time_minutes,
        s.kills,
        s.headshot_kills,
        percent(s.headshot_kills, s.kills),
        s.damage_dealt,
        s.assists,
        s.dbnos,
        s.longest_kill,
    )?;
    writeln!(
        out,
        "    heals {} | boosts {} | revives {} given, {} received",
        s.heals_used, s.boosts_used, s.revives, s.revives_received
    )
}

fn write_announcement(out: &mut String, a: &MatchAnnouncement) -> fmt::Result {
    let plural = if a.players.len() == 1 { "" } else { "s" };
    writeln!(out, "{} - {} player{}", a.category, a.players.len(), plural)?;
    writeln!(
        out,
        "{} | {} | {} min | {}",
        a.map,
        mode_display(&a.game_mode),
        a.duration_minutes,
        a.played_at
    )?;
    writeln!(
        out,
        "Team: best #{} | {} kills ({} hs, {:.0}%) | {:.0} dmg | avg survival {:.1} min",
        a.team.best_rank,
        a.team.total_kills,
        a.team.total_headshots,
        a.team.headshot_percent,
        a.team.total_damage,
        a.team.avg_survival_minutes
    )?;
    for line in &a.players {
        write_player(out, line)?;
    }
    let short_id = a.match_id.get(..12).unwrap_or(&a.match_id);
    write!(out, "Match {}/{} | ID {}", a.position, a.batch_size, short_id)
}

fn write_weekly_best(out: &mut String, w: &WeeklyBest) -> fmt::Result {
    let p = &w.player;
    writeln!(out, "Best player - last {} days: {}", w.lookback_days, p.player)?;
    writeln!(
        out,
        "Matches {} | wins {} | top 5 {} ({}%) | win rate {}%",
        p.matches, p.wins, p.top_5, p.top_5_rate, p.win_rate
    )?;
    writeln!(
        out,
        "Kills: avg {} | best {} | total {} | headshots {}",
        p.avg_kills, p.best_kills, p.total_kills, p.total_headshots
    )?;
    writeln!(
        out,
        "Damage: avg {} | best {:.0} | total {:.0}",
        p.avg_damage, p.best_damage, p.total_damage
    )?;
    writeln!(out, "Support: {} assists | {} knocks", p.total_assists, p.total_dbnos)?;
    writeln!(
        out,
        "Survival: avg {} min | best {:.1} min | total {:.1} h",
        p.avg_survival,
        p.best_survival,
        p.total_survival / 60.0
    )?;
    writeln!(
        out,
        "Distance: avg {} km | total {:.1} km",
        p.avg_distance, p.total_distance
    )?;
    writeln!(out, "Score: {:.0}", p.score)?;

    if !w.top_longest_kills.is_empty() {
        writeln!(out, "Longest kills:")?;
        for (i, kill) in w.top_longest_kills.iter().enumerate() {
            writeln!(out, "  {}. {} {:.0}m", i + 1, kill.player, kill.distance)?;
        }
    }
    write!(out, "Calculated from {} matches", w.total_matches)
}

fn write_leaderboard(out: &mut String, l: &Leaderboard) -> fmt::Result {
    writeln!(
        out,
        "Leaderboard - last {} days (top {})",
        l.lookback_days,
        l.entries.len()
    )?;
    for (i, p) in l.entries.iter().enumerate() {
        writeln!(
            out,
            "{}. {} | score {:.0} | {} matches | {} wins | avg kills {} | avg dmg {:.0}",
            i + 1,
            p.player,
            p.score,
            p.matches,
            p.wins,
            p.avg_kills,
            p.avg_damage
        )?;
    }
    write!(out, "Based on {} total matches", l.total_matches)
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        match self {
            OutboundMessage::MatchAnnouncement(a) => write_announcement(&mut out, a)?,
            OutboundMessage::WeeklyBest(w) => write_weekly_best(&mut out, w)?,
            OutboundMessage::Leaderboard(l) => write_leaderboard(&mut out, l)?,
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::models::TeamSummary;
    use crate::stats::{LongestKill, WeeklyPlayerAggregate};
    use crate::tracker::PlayerMatchStats;

    #[test]
    fn test_announcement_text() {
        let message = OutboundMessage::MatchAnnouncement(MatchAnnouncement {
            match_id: "0123456789abcdef".to_string(),
            category: "RANKED".to_string(),
            game_mode: "squad-fpp".to_string(),
            map: "Taego".to_string(),
            duration_minutes: 31,
            played_at: "2026-10-12T18:00:00Z".to_string(),
            position: 1,
            batch_size: 3,
            team: TeamSummary {
                best_rank: 2,
                total_kills: 4,
                total_damage: 512.4,
                total_headshots: 1,
                headshot_percent: 25.0,
                avg_survival_minutes: 27.25,
            },
            players: vec![PlayerLine {
                name: "Alice".to_string(),
                stats: PlayerMatchStats {
                    rank: 2,
                    kills: 4,
                    ..PlayerMatchStats::default()
                },
            }],
        });

        let text = message.to_string();

        assert!(text.starts_with("RANKED - 1 player\n"));
        assert!(text.contains("Taego | squad (FPP) | 31 min"));
        assert!(text.contains("Team: best #2 | 4 kills (1 hs, 25%)"));
        assert!(text.contains("Alice #2"));
        assert!(text.ends_with("Match 1/3 | ID 0123456789ab"));
    }

    #[test]
    fn test_weekly_best_text_lists_longest_kills() {
        let message = OutboundMessage::WeeklyBest(WeeklyBest {
            lookback_days: 7,
            total_matches: 12,
            player: WeeklyPlayerAggregate {
                player: "Alice".to_string(),
                matches: 3,
                score: 1750.0,
                ..WeeklyPlayerAggregate::default()
            },
            top_longest_kills: vec![LongestKill {
                player: "Bob".to_string(),
                distance: 402.6,
            }],
        });

        let text = message.to_string();

        assert!(text.starts_with("Best player - last 7 days: Alice"));
        assert!(text.contains("Score: 1750"));
        assert!(text.contains("1. Bob 403m"));
        assert!(text.ends_with("Calculated from 12 matches"));
    }
}
