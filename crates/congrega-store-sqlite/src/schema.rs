//! SQL schema for the Congrega SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every tenant table carries `company_id` and every query filters on it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- People are never deleted; status flips between 'active' and 'inactive'.
CREATE TABLE IF NOT EXISTS people (
    person_id   TEXT PRIMARY KEY,
    company_id  TEXT NOT NULL,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL DEFAULT '',
    photo       TEXT,
    status      TEXT NOT NULL DEFAULT 'active',
    created_at  TEXT NOT NULL
);

-- Events are soft-canceled, never deleted.
CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    company_id  TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    starts_at   TEXT,
    status      TEXT NOT NULL DEFAULT 'active',
    created_at  TEXT NOT NULL
);

-- A row means present. One row per (event, person).
CREATE TABLE IF NOT EXISTS attendance (
    attendance_id TEXT PRIMARY KEY,
    company_id    TEXT NOT NULL,
    event_id      TEXT NOT NULL REFERENCES events(event_id),
    person_id     TEXT NOT NULL REFERENCES people(person_id),
    recorded_at   TEXT NOT NULL,
    UNIQUE (event_id, person_id)
);

CREATE TABLE IF NOT EXISTS ministries (
    ministry_id TEXT PRIMARY KEY,
    company_id  TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ministry_members (
    company_id  TEXT NOT NULL,
    ministry_id TEXT NOT NULL REFERENCES ministries(ministry_id),
    person_id   TEXT NOT NULL REFERENCES people(person_id),
    role        TEXT NOT NULL,
    UNIQUE (ministry_id, person_id)
);

CREATE TABLE IF NOT EXISTS cell_groups (
    cell_group_id TEXT PRIMARY KEY,
    company_id    TEXT NOT NULL,
    ministry_id   TEXT NOT NULL REFERENCES ministries(ministry_id),
    name          TEXT NOT NULL,
    description   TEXT,
    created_at    TEXT NOT NULL
);

-- person_id is a loose link: the resolver reports unresolvable people as
-- 'Unknown' instead of rejecting the list.
CREATE TABLE IF NOT EXISTS cell_members (
    company_id    TEXT NOT NULL,
    cell_group_id TEXT NOT NULL REFERENCES cell_groups(cell_group_id),
    person_id     TEXT NOT NULL,
    UNIQUE (cell_group_id, person_id)
);

-- The access catalog is shared by every tenant and carries no company_id.
CREATE TABLE IF NOT EXISTS roles (
    role_id     TEXT PRIMARY KEY,
    module_id   TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS permissions (
    permission_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    token         TEXT NOT NULL,
    description   TEXT,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS people_company_idx      ON people(company_id, status);
CREATE INDEX IF NOT EXISTS events_company_idx      ON events(company_id, status);
CREATE INDEX IF NOT EXISTS attendance_person_idx   ON attendance(person_id);
CREATE INDEX IF NOT EXISTS ministries_company_idx  ON ministries(company_id);
CREATE INDEX IF NOT EXISTS cell_groups_ministry_idx ON cell_groups(ministry_id);

PRAGMA user_version = 1;
";
