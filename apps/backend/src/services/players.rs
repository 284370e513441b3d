//! Player domain service.
//!
//! Business-logic façade over the repository. Handlers own request-shape
//! validation; the service owns existence semantics (update/delete of an
//! unknown id report not-found through `Option`).

use sea_orm::ConnectionTrait;

use crate::errors::domain::DomainError;
use crate::repos::players::{self, NewPlayer, Player, PlayerPatch};

#[derive(Debug, Default)]
pub struct PlayerService;

impl PlayerService {
    pub fn new() -> Self {
        Self
    }

    /// One page of players, zero-based page index, ordered by id.
    pub async fn get_all<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        page: u64,
        size: u64,
    ) -> Result<Vec<Player>, DomainError> {
        players::list(conn, page, size).await
    }

    /// Total number of stored players.
    pub async fn get_all_count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError> {
        players::count(conn).await
    }

    /// Persist a new player; the store assigns a fresh id.
    pub async fn create_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        new_player: NewPlayer,
    ) -> Result<Player, DomainError> {
        players::create(conn, new_player).await
    }

    /// Partial update: only non-absent patch fields are applied.
    /// Returns `None` when the id is unknown.
    pub async fn update_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: PlayerPatch,
    ) -> Result<Option<Player>, DomainError> {
        players::update(conn, id, patch).await
    }

    /// Remove a player by id. Returns the removed player,
    /// or `None` when the id is unknown.
    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Player>, DomainError> {
        players::delete(conn, id).await
    }
}
