/// Inline SQL migrations for the playlog database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: statuses table
    r#"
CREATE TABLE IF NOT EXISTS statuses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    sort_order INTEGER NOT NULL DEFAULT 0
);
"#,
    // Migration 2: seed statuses. INSERT OR IGNORE keeps user renames on
    // re-run; ids are fixed so seeds stay addressable.
    r#"
INSERT OR IGNORE INTO statuses (id, name, slug, sort_order) VALUES
    (1, 'Backlog', 'backlog', 10),
    (2, 'Jogando', 'jogando', 20),
    (3, 'Pausado', 'pausado', 30),
    (4, 'Finalizado', 'finalizado', 40),
    (5, 'Dropado', 'dropado', 50);
"#,
    // Migration 3: games table
    r#"
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    platform TEXT,
    cover_url TEXT,
    external_source TEXT,
    external_id TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#,
    // Migration 4: cycles table
    r#"
CREATE TABLE IF NOT EXISTS cycles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    status_id INTEGER REFERENCES statuses(id),
    started_at INTEGER NOT NULL,
    ended_at INTEGER,
    rating_final REAL,
    review TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    CHECK (ended_at IS NULL OR ended_at >= started_at),
    CHECK (rating_final IS NULL OR (rating_final >= 0 AND rating_final <= 10))
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_cycles_game ON cycles(game_id);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_cycles_started ON cycles(started_at DESC);"#,
    // Migration 5: sessions table. The partial unique index is the hard
    // guarantee that a cycle has at most one open session.
    r#"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cycle_id INTEGER NOT NULL REFERENCES cycles(id) ON DELETE CASCADE,
    started_at INTEGER NOT NULL,
    ended_at INTEGER,
    score REAL,
    note TEXT,
    CHECK (ended_at IS NULL OR ended_at >= started_at),
    CHECK (score IS NULL OR (score >= 0 AND score <= 10))
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_sessions_cycle ON sessions(cycle_id);"#,
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_open_cycle
    ON sessions(cycle_id) WHERE ended_at IS NULL;
"#,
    // Migration 6: external ratings, one row per (game, source)
    r#"
CREATE TABLE IF NOT EXISTS external_ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    source TEXT NOT NULL,
    score REAL NOT NULL,
    scale_max REAL NOT NULL,
    url TEXT,
    fetched_at INTEGER NOT NULL,
    UNIQUE (game_id, source)
);
"#,
    // Migration 7: per-cycle aggregates over finished sessions only.
    // Minutes floor per session, then sum.
    r#"
CREATE VIEW IF NOT EXISTS vw_cycle_stats AS
SELECT
    c.id AS cycle_id,
    COUNT(s.id) AS sessions_count_finished,
    COALESCE(SUM((s.ended_at - s.started_at) / 60), 0) AS total_minutes_finished,
    AVG(s.score) AS avg_session_score
FROM cycles c
LEFT JOIN sessions s ON s.cycle_id = c.id AND s.ended_at IS NOT NULL
GROUP BY c.id;
"#,
    // Migration 8: cycles joined with game, status and aggregates — the
    // read shape for lists, detail screens and the stats derivation.
    r#"
CREATE VIEW IF NOT EXISTS vw_cycles_enriched AS
SELECT
    c.id,
    c.game_id,
    g.title AS game_title,
    g.platform AS game_platform,
    g.cover_url AS game_cover_url,
    c.status_id,
    st.name AS status_name,
    st.slug AS status_slug,
    c.started_at,
    c.ended_at,
    c.rating_final,
    c.review,
    cs.sessions_count_finished,
    cs.total_minutes_finished,
    cs.avg_session_score,
    c.created_at,
    c.updated_at
FROM cycles c
JOIN games g ON g.id = c.game_id
LEFT JOIN statuses st ON st.id = c.status_id
LEFT JOIN vw_cycle_stats cs ON cs.cycle_id = c.id;
"#,
    // Migration 9: per-game rollup across all cycles
    r#"
CREATE VIEW IF NOT EXISTS vw_game_overview AS
SELECT
    g.id AS game_id,
    g.title,
    g.platform,
    g.cover_url,
    COUNT(c.id) AS cycles_count,
    COALESCE(SUM(CASE WHEN c.id IS NOT NULL AND c.ended_at IS NULL THEN 1 ELSE 0 END), 0) AS open_cycles,
    MAX(c.rating_final) AS best_rating,
    COALESCE(SUM(cs.total_minutes_finished), 0) AS total_minutes,
    COALESCE(SUM(cs.sessions_count_finished), 0) AS sessions_count,
    MAX(COALESCE(c.ended_at, c.started_at)) AS last_activity_at
FROM games g
LEFT JOIN cycles c ON c.game_id = g.id
LEFT JOIN vw_cycle_stats cs ON cs.cycle_id = c.id
GROUP BY g.id;
"#,
];
