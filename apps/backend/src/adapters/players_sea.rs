//! SeaORM adapter for the player repository.
//!
//! The only module that issues queries against the `players` table.
//! Functions are generic over `ConnectionTrait` so they run equally on a
//! pooled connection or inside a transaction.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::players;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(id).one(conn).await
}

/// One page of players ordered by id ascending. Pages are zero-based;
/// a page past the end of the data yields an empty vec.
pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    size: u64,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .order_by_asc(players::Column::Id)
        .offset(page.saturating_mul(size))
        .limit(size)
        .all(conn)
        .await
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    players::Entity::find().count(conn).await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    title: String,
    race: &str,
    profession: &str,
    birthday: OffsetDateTime,
    banned: bool,
    level: i32,
) -> Result<players::Model, sea_orm::DbErr> {
    let active = players::ActiveModel {
        name: Set(name),
        title: Set(title),
        race: Set(race.to_string()),
        profession: Set(profession.to_string()),
        birthday: Set(birthday),
        banned: Set(banned),
        level: Set(level),
        ..Default::default()
    };
    active.insert(conn).await
}

/// Apply the provided fields to the row with the given id.
/// Returns `None` when the row does not exist. A call with no fields to
/// apply returns the row unchanged without touching the database.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: Option<String>,
    title: Option<String>,
    race: Option<&str>,
    profession: Option<&str>,
    banned: Option<bool>,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    let Some(existing) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    if name.is_none()
        && title.is_none()
        && race.is_none()
        && profession.is_none()
        && banned.is_none()
    {
        return Ok(Some(existing));
    }

    let mut active: players::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(title) = title {
        active.title = Set(title);
    }
    if let Some(race) = race {
        active.race = Set(race.to_string());
    }
    if let Some(profession) = profession {
        active.profession = Set(profession.to_string());
    }
    if let Some(banned) = banned {
        active.banned = Set(banned);
    }

    active.update(conn).await.map(Some)
}

/// Delete the row with the given id, returning the deleted row,
/// or `None` when it does not exist.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    let Some(existing) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    existing.clone().delete(conn).await?;
    Ok(Some(existing))
}
