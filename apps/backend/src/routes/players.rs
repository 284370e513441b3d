//! Player HTTP routes under `/rest/players`.
//!
//! The handlers own request-shape validation; anything that passes is
//! handed to the service inside a per-request transaction. Client errors
//! are rendered as empty-body 400/404 responses by `AppError`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::repos::players::{NewPlayer, Player, PlayerPatch, Profession, Race};
use crate::services::players::PlayerService;
use crate::state::app_state::AppState;

const NAME_MAX_CHARS: usize = 12;
const TITLE_MAX_CHARS: usize = 30;
const BIRTHDAY_MIN_YEAR: i32 = 2000;
const BIRTHDAY_MAX_YEAR: i32 = 3000;
const DEFAULT_PAGE_NUMBER: u64 = 0;
const DEFAULT_PAGE_SIZE: u64 = 3;

/// Wire record for a player. Response-side it is always fully populated;
/// birthday travels as raw epoch milliseconds.
#[derive(Debug, Serialize)]
pub struct PlayerInfo {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: i64,
    pub banned: bool,
    pub level: i32,
}

impl From<Player> for PlayerInfo {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            title: value.title,
            race: value.race,
            profession: value.profession,
            birthday: to_epoch_millis(value.birthday),
            banned: value.banned,
            level: value.level,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPlayersQuery {
    #[serde(rename = "pageNumber", default)]
    pub page_number: Option<u64>,
    #[serde(rename = "pageSize", default)]
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PlayerCountResponse {
    pub count: u64,
}

/// Create request: every field optional so that presence is checked by the
/// handler (missing fields are a 400, not a deserialization failure).
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub race: Option<Race>,
    #[serde(default)]
    pub profession: Option<Profession>,
    #[serde(default)]
    pub birthday: Option<i64>,
    #[serde(default)]
    pub banned: Option<bool>,
    #[serde(default)]
    pub level: Option<i32>,
}

/// Update request: absent fields leave the stored value unchanged.
/// Birthday and level are not updatable; extra JSON keys are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub race: Option<Race>,
    #[serde(default)]
    pub profession: Option<Profession>,
    #[serde(default)]
    pub banned: Option<bool>,
}

/// GET /rest/players?pageNumber=&pageSize=
async fn get_all(
    req: HttpRequest,
    query: web::Query<ListPlayersQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page_number.unwrap_or(DEFAULT_PAGE_NUMBER);
    let size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let players = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            Ok(service.get_all(txn, page, size).await?)
        })
    })
    .await?;

    let records: Vec<PlayerInfo> = players.into_iter().map(PlayerInfo::from).collect();
    Ok(HttpResponse::Ok().json(records))
}

/// GET /rest/players/count
async fn get_all_count(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let count = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            Ok(service.get_all_count(txn).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PlayerCountResponse { count }))
}

/// POST /rest/players
async fn create_player(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let new_player = validate_create(body.into_inner())?;

    let player = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            Ok(service.create_player(txn, new_player).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PlayerInfo::from(player)))
}

/// POST /rest/players/{id}
async fn update_player(
    req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if id <= 0 {
        return Err(AppError::invalid(
            ErrorCode::InvalidPlayerId,
            format!("Player id must be positive, got {id}"),
        ));
    }

    let payload = body.into_inner();
    if let Some(name) = &payload.name {
        if name.is_empty() || name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("Name must be 1-{NAME_MAX_CHARS} characters"),
            ));
        }
    }
    // Unlike create, an empty title passes here; only the upper bound is
    // checked. Kept as-is to preserve the original endpoint contract.
    if let Some(title) = &payload.title {
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("Title must be at most {TITLE_MAX_CHARS} characters"),
            ));
        }
    }

    let patch = PlayerPatch {
        name: payload.name,
        title: payload.title,
        race: payload.race,
        profession: payload.profession,
        banned: payload.banned,
    };

    let updated = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            Ok(service.update_player(txn, id, patch).await?)
        })
    })
    .await?;

    match updated {
        Some(player) => Ok(HttpResponse::Ok().json(PlayerInfo::from(player))),
        None => Err(AppError::not_found(
            ErrorCode::PlayerNotFound,
            format!("Player with id {id} not found"),
        )),
    }
}

/// DELETE /rest/players/{id}
async fn delete_player(
    req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if id <= 0 {
        return Err(AppError::invalid(
            ErrorCode::InvalidPlayerId,
            format!("Player id must be positive, got {id}"),
        ));
    }

    let deleted = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            Ok(service.delete(txn, id).await?)
        })
    })
    .await?;

    match deleted {
        Some(_) => Ok(HttpResponse::Ok().finish()),
        None => Err(AppError::not_found(
            ErrorCode::PlayerNotFound,
            format!("Player with id {id} not found"),
        )),
    }
}

/// Create validation, in contract order, short-circuiting on the first
/// failure.
fn validate_create(info: CreatePlayerRequest) -> Result<NewPlayer, AppError> {
    let name = match info.name {
        Some(name) if !name.is_empty() && name.chars().count() <= NAME_MAX_CHARS => name,
        _ => {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("Name is required and must be 1-{NAME_MAX_CHARS} characters"),
            ))
        }
    };

    let title = match info.title {
        Some(title) if !title.is_empty() && title.chars().count() <= TITLE_MAX_CHARS => title,
        _ => {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("Title is required and must be 1-{TITLE_MAX_CHARS} characters"),
            ))
        }
    };

    let race = info.race.ok_or_else(|| {
        AppError::invalid(ErrorCode::ValidationError, "Race is required".to_string())
    })?;

    let profession = info.profession.ok_or_else(|| {
        AppError::invalid(
            ErrorCode::ValidationError,
            "Profession is required".to_string(),
        )
    })?;

    let birthday_ms = match info.birthday {
        Some(ms) if ms >= 0 => ms,
        _ => {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "Birthday is required and must be non-negative".to_string(),
            ))
        }
    };
    let birthday = birthday_from_millis(birthday_ms)?;

    let level = info.level.ok_or_else(|| {
        AppError::invalid(ErrorCode::ValidationError, "Level is required".to_string())
    })?;

    Ok(NewPlayer {
        name,
        title,
        race,
        profession,
        birthday,
        banned: info.banned.unwrap_or(false),
        level,
    })
}

/// Parse epoch milliseconds into a timestamp whose calendar year (UTC)
/// falls within the allowed range.
fn birthday_from_millis(ms: i64) -> Result<OffsetDateTime, AppError> {
    let birthday = OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .map_err(|_| {
            AppError::invalid(
                ErrorCode::ValidationError,
                format!("Birthday {ms} is out of range"),
            )
        })?;

    let year = birthday.year();
    if !(BIRTHDAY_MIN_YEAR..=BIRTHDAY_MAX_YEAR).contains(&year) {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Birthday year {year} must be within [{BIRTHDAY_MIN_YEAR}, {BIRTHDAY_MAX_YEAR}]"),
        ));
    }

    Ok(birthday)
}

fn to_epoch_millis(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_all))
            .route(web::post().to(create_player)),
    );
    cfg.service(web::resource("/count").route(web::get().to(get_all_count)));
    cfg.service(
        web::resource("/{id}")
            .route(web::post().to(update_player))
            .route(web::delete().to(delete_player)),
    );
}
