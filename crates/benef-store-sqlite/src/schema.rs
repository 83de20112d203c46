//! SQL schema for the beneficiary SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Reference data, administered outside the application.
CREATE TABLE IF NOT EXISTS document_types (
    id            INTEGER PRIMARY KEY,
    name          TEXT    NOT NULL,
    abbreviation  TEXT    NOT NULL,
    country       TEXT    NOT NULL,
    length        INTEGER NOT NULL CHECK (length > 0),
    numeric_only  INTEGER NOT NULL DEFAULT 0,
    active        INTEGER NOT NULL DEFAULT 1
);

-- AUTOINCREMENT guarantees ids are never reused after a delete.
CREATE TABLE IF NOT EXISTS beneficiaries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    given_names       TEXT    NOT NULL CHECK (length(given_names) BETWEEN 1 AND 100),
    surnames          TEXT    NOT NULL CHECK (length(surnames) BETWEEN 1 AND 100),
    document_type_id  INTEGER NOT NULL REFERENCES document_types(id),
    document_number   TEXT    NOT NULL CHECK (length(document_number) BETWEEN 1 AND 20),
    birth_date        TEXT    NOT NULL,   -- YYYY-MM-DD
    sex               TEXT    NOT NULL CHECK (sex IN ('M', 'F')),
    UNIQUE (document_type_id, document_number)
);

CREATE INDEX IF NOT EXISTS beneficiaries_document_type_idx
    ON beneficiaries(document_type_id);

PRAGMA user_version = 1;
";

/// Default catalog. `INSERT OR IGNORE` keeps administered rows untouched.
pub const SEED_DOCUMENT_TYPES: &str = "
INSERT OR IGNORE INTO document_types
    (id, name, abbreviation, country, length, numeric_only, active)
VALUES
    (1, 'Documento Nacional de Identidad',  'DNI', 'Perú',     8,  1, 1),
    (2, 'Carné de Extranjería',             'CE',  'Perú',     9,  0, 1),
    (3, 'Pasaporte',                        'PAS', 'Perú',     12, 0, 1),
    (4, 'Registro Único de Contribuyentes', 'RUC', 'Perú',     11, 1, 1),
    (5, 'Cédula de Ciudadanía',             'CC',  'Colombia', 10, 1, 1),
    (6, 'Rol Único Nacional',               'RUN', 'Chile',    9,  0, 1);
";
