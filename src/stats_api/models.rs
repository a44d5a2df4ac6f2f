//! Wire types for the stats API's JSON:API documents.
//!
//! Only the fields the tracker reads are modelled; everything else is ignored.

use serde::Deserialize;

/// `GET /{platform}/players?filter[playerNames]=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub data: Vec<PlayerResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResource {
    pub id: String,
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: PlayerRelationships,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRelationships {
    #[serde(default)]
    pub matches: RelationshipList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<ResourceRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}

impl PlayerResource {
    /// Match ids are listed most recent first
    pub fn latest_match_id(&self) -> Option<&str> {
        self.relationships
            .matches
            .data
            .first()
            .map(|m| m.id.as_str())
    }
}

/// `GET /{platform}/matches/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    pub data: MatchData,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchData {
    pub id: String,
    pub attributes: MatchAttributes,
}

fn unknown() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAttributes {
    #[serde(default = "unknown")]
    pub game_mode: String,
    #[serde(default = "unknown")]
    pub match_type: String,
    #[serde(default)]
    pub is_custom_match: bool,
    #[serde(default = "unknown")]
    pub map_name: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub created_at: String,
}

/// Side-loaded resources. Rosters, assets and anything else are skipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncludedResource {
    Participant { attributes: ParticipantAttributes },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantAttributes {
    #[serde(default)]
    pub stats: ParticipantStats,
}

/// Raw per-participant stats as the API reports them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantStats {
    pub name: String,
    pub win_place: Option<u32>,
    pub kills: u32,
    pub damage_dealt: f64,
    pub assists: u32,
    #[serde(rename = "DBNOs")]
    pub dbnos: u32,
    pub headshot_kills: u32,
    pub longest_kill: f64,
    pub revives: u32,
    pub revived_count: u32,
    pub team_kills: u32,
    pub vehicle_destroys: u32,
    pub weapons_acquired: u32,
    pub boosts: u32,
    pub heals: u32,
    pub walk_distance: f64,
    pub ride_distance: f64,
    pub swim_distance: f64,
    pub time_survived: f64,
    pub death_type: Option<String>,
    pub kill_streaks: u32,
    pub road_kills: u32,
}

impl MatchResponse {
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantStats> {
        self.included.iter().filter_map(|resource| match resource {
            IncludedResource::Participant { attributes } => Some(&attributes.stats),
            IncludedResource::Other => None,
        })
    }
}
