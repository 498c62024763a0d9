//! Table definitions, applied idempotently at startup

use sqlx::PgPool;
use tracing::info;

/// DDL for every table the repositories touch
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meetings (
    id            TEXT PRIMARY KEY,
    organizer_id  TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS candidate_places (
    meeting_id     TEXT NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
    place_id       TEXT NOT NULL,
    name           TEXT NOT NULL,
    category       TEXT NOT NULL DEFAULT '',
    lat            DOUBLE PRECISION NOT NULL,
    lng            DOUBLE PRECISION NOT NULL,
    rating         DOUBLE PRECISION,
    added_by_id    TEXT NOT NULL,
    added_by_name  TEXT NOT NULL,
    added_at       TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (meeting_id, place_id)
);

CREATE TABLE IF NOT EXISTS votes (
    meeting_id  TEXT NOT NULL,
    voter_id    TEXT NOT NULL,
    voter_name  TEXT NOT NULL,
    place_id    TEXT NOT NULL,
    voted_at    TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (meeting_id, voter_id),
    FOREIGN KEY (meeting_id, place_id) REFERENCES candidate_places(meeting_id, place_id)
);

CREATE TABLE IF NOT EXISTS chat_messages (
    id           UUID PRIMARY KEY,
    meeting_id   TEXT NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
    author_id    TEXT NOT NULL,
    author_name  TEXT NOT NULL,
    content      TEXT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_messages_meeting
    ON chat_messages (meeting_id, created_at);

CREATE TABLE IF NOT EXISTS message_reactions (
    message_id  UUID NOT NULL REFERENCES chat_messages(id) ON DELETE CASCADE,
    emoji       TEXT NOT NULL,
    user_id     TEXT NOT NULL,
    ordinal     INTEGER NOT NULL,
    PRIMARY KEY (message_id, emoji, user_id)
);

CREATE TABLE IF NOT EXISTS selection_events (
    id                BIGSERIAL PRIMARY KEY,
    meeting_id        TEXT NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
    participant_id    TEXT NOT NULL,
    participant_name  TEXT NOT NULL,
    selected_at       TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_selection_events_meeting
    ON selection_events (meeting_id, selected_at);
"#;

/// Create missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Database schema verified");
    Ok(())
}
