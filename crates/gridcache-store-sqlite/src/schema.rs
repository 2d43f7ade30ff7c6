//! SQL schema for the gridcache SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Natural keys are the primary keys: season year, (season_year, round) for
/// races and winners, the upstream string ids for drivers and constructors.
/// The ingestion path never deletes rows.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS seasons (
    year        INTEGER PRIMARY KEY,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS races (
    season_year  INTEGER NOT NULL REFERENCES seasons(year),
    round        INTEGER NOT NULL,
    race_name    TEXT NOT NULL,
    circuit_name TEXT NOT NULL DEFAULT '',
    date         TEXT,            -- YYYY-MM-DD or NULL
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    PRIMARY KEY (season_year, round)
);

CREATE TABLE IF NOT EXISTS drivers (
    driver_id        TEXT PRIMARY KEY,   -- upstream id, e.g. 'max_verstappen'
    given_name       TEXT NOT NULL,
    family_name      TEXT NOT NULL,
    code             TEXT,
    permanent_number TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS constructors (
    constructor_id TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    nationality    TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Exactly one winner per race; re-ingestion updates the row in place.
CREATE TABLE IF NOT EXISTS winners (
    season_year    INTEGER NOT NULL,
    round          INTEGER NOT NULL,
    driver_id      TEXT NOT NULL REFERENCES drivers(driver_id),
    constructor_id TEXT NOT NULL REFERENCES constructors(constructor_id),
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    PRIMARY KEY (season_year, round),
    FOREIGN KEY (season_year, round) REFERENCES races(season_year, round)
);

CREATE INDEX IF NOT EXISTS winners_driver_idx      ON winners(driver_id);
CREATE INDEX IF NOT EXISTS winners_constructor_idx ON winners(constructor_id);
CREATE INDEX IF NOT EXISTS races_season_idx        ON races(season_year);

PRAGMA user_version = 1;
";
