pub mod aggregate;
pub mod service;

mod errors;
pub mod models;

pub use aggregate::compute_weekly_best;
pub use errors::StatsError;
pub use models::*;
pub use service::WeeklyStatsService;

/// Categories whose matches never count towards weekly rankings
pub const EXCLUDED_CATEGORIES: [&str; 3] = ["CASUAL", "ARCADE", "AIROYALE"];

/// Number of entries in the longest-kill side table
pub const LONGEST_KILL_SLOTS: usize = 3;

/// Weights of the composite ranking score
pub mod score_weight {
    pub const AVG_KILLS: f64 = 100.0;
    pub const AVG_DAMAGE: f64 = 0.5;
    pub const WIN: f64 = 500.0;
    pub const TOP_5: f64 = 100.0;
    pub const TOP_10: f64 = 50.0;
    pub const AVG_SURVIVAL: f64 = 10.0;
    pub const HEADSHOT: f64 = 20.0;
}
