//! Repository layer for players: domain types and model conversion.
//!
//! Race and profession are stored as strings; a stored value outside the
//! known sets is data corruption, not user error.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::adapters::players_sea as adapter;
use crate::entities::players;
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Orc,
    Troll,
    Hobbit,
    Giant,
}

impl Race {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "HUMAN",
            Self::Dwarf => "DWARF",
            Self::Elf => "ELF",
            Self::Orc => "ORC",
            Self::Troll => "TROLL",
            Self::Hobbit => "HOBBIT",
            Self::Giant => "GIANT",
        }
    }

    pub fn from_db(value: &str, player_id: i64) -> Result<Self, DomainError> {
        match value {
            "HUMAN" => Ok(Self::Human),
            "DWARF" => Ok(Self::Dwarf),
            "ELF" => Ok(Self::Elf),
            "ORC" => Ok(Self::Orc),
            "TROLL" => Ok(Self::Troll),
            "HOBBIT" => Ok(Self::Hobbit),
            "GIANT" => Ok(Self::Giant),
            other => Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("invalid race '{other}' stored for player id={player_id}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Druid,
    Warlock,
    Nazgul,
}

impl Profession {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warrior => "WARRIOR",
            Self::Rogue => "ROGUE",
            Self::Sorcerer => "SORCERER",
            Self::Cleric => "CLERIC",
            Self::Paladin => "PALADIN",
            Self::Druid => "DRUID",
            Self::Warlock => "WARLOCK",
            Self::Nazgul => "NAZGUL",
        }
    }

    pub fn from_db(value: &str, player_id: i64) -> Result<Self, DomainError> {
        match value {
            "WARRIOR" => Ok(Self::Warrior),
            "ROGUE" => Ok(Self::Rogue),
            "SORCERER" => Ok(Self::Sorcerer),
            "CLERIC" => Ok(Self::Cleric),
            "PALADIN" => Ok(Self::Paladin),
            "DRUID" => Ok(Self::Druid),
            "WARLOCK" => Ok(Self::Warlock),
            "NAZGUL" => Ok(Self::Nazgul),
            other => Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("invalid profession '{other}' stored for player id={player_id}"),
            )),
        }
    }
}

/// A persisted player in domain terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: OffsetDateTime,
    pub banned: bool,
    pub level: i32,
}

/// Fields for creating a player; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: OffsetDateTime,
    pub banned: bool,
    pub level: i32,
}

/// Partial update: absent fields leave the stored value unchanged.
/// Birthday and level are not part of the update contract.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub banned: Option<bool>,
}

impl TryFrom<players::Model> for Player {
    type Error = DomainError;

    fn try_from(model: players::Model) -> Result<Self, Self::Error> {
        let race = Race::from_db(&model.race, model.id)?;
        let profession = Profession::from_db(&model.profession, model.id)?;
        Ok(Self {
            id: model.id,
            name: model.name,
            title: model.title,
            race,
            profession,
            birthday: model.birthday,
            banned: model.banned,
            level: model.level,
        })
    }
}

/// List one page of players, ordered by id ascending.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    size: u64,
) -> Result<Vec<Player>, DomainError> {
    let models = adapter::list_page(conn, page, size).await?;
    models.into_iter().map(Player::try_from).collect()
}

/// Total number of stored players.
pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(adapter::count(conn).await?)
}

/// Persist a new player; the store assigns a fresh id.
pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_player: NewPlayer,
) -> Result<Player, DomainError> {
    let model = adapter::insert(
        conn,
        new_player.name,
        new_player.title,
        new_player.race.as_str(),
        new_player.profession.as_str(),
        new_player.birthday,
        new_player.banned,
        new_player.level,
    )
    .await?;
    Player::try_from(model)
}

/// Apply the non-absent patch fields to the player with the given id.
/// Returns `None` when no such player exists.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    patch: PlayerPatch,
) -> Result<Option<Player>, DomainError> {
    let model = adapter::update(
        conn,
        id,
        patch.name,
        patch.title,
        patch.race.map(|r| r.as_str()),
        patch.profession.map(|p| p.as_str()),
        patch.banned,
    )
    .await?;
    model.map(Player::try_from).transpose()
}

/// Remove the player with the given id, returning the removed row,
/// or `None` when no such player exists.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Player>, DomainError> {
    let model = adapter::delete(conn, id).await?;
    model.map(Player::try_from).transpose()
}
