use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// The uniqueness rules the application checks first are enforced
/// authoritatively here: concurrent check-then-insert races end at these
/// constraints.
const SETUP_SQL: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        bio TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'user',
        is_superuser BOOLEAN NOT NULL DEFAULT 0,
        confirmation_salt TEXT NOT NULL,
        last_login TIMESTAMP,
        UNIQUE (username, email)
    );

    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS titles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        year INTEGER NOT NULL,
        description TEXT,
        category_id INTEGER REFERENCES categories (id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS title_genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title_id INTEGER NOT NULL REFERENCES titles (id) ON DELETE CASCADE,
        genre_id INTEGER NOT NULL REFERENCES genres (id) ON DELETE CASCADE,
        UNIQUE (title_id, genre_id)
    );

    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title_id INTEGER NOT NULL REFERENCES titles (id) ON DELETE CASCADE,
        author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        score INTEGER NOT NULL,
        pub_date TIMESTAMP NOT NULL,
        UNIQUE (title_id, author_id)
    );

    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        review_id INTEGER NOT NULL REFERENCES reviews (id) ON DELETE CASCADE,
        author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        pub_date TIMESTAMP NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_titles_name ON titles (name);
    CREATE INDEX IF NOT EXISTS idx_reviews_title ON reviews (title_id);
    CREATE INDEX IF NOT EXISTS idx_comments_review ON comments (review_id);
";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new SQLite database instance
    pub fn new(database_path: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .build(manager)
            .expect("Failed to create SQLite connection pool");

        let mut conn = pool.get().expect("Failed to get SQLite connection");
        conn.batch_execute(SETUP_SQL)
            .expect("Failed to set up the database schema");

        Database { pool }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
