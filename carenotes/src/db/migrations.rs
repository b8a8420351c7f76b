use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![M::up(
        r#"
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                resident_name TEXT NOT NULL CHECK(length(resident_name) > 0),
                author_name TEXT NOT NULL CHECK(length(author_name) > 0),
                content TEXT NOT NULL,
                date_time TEXT NOT NULL
            );

            CREATE INDEX notes_resident_name ON notes (resident_name);
        "#
    )]);
}

// resident, author, content, date_time
pub const DEMO_NOTES: [(&str, &str, &str, &str); 2] = [
    (
        "Alice Johnson",
        "Nurse Smith",
        "Medication administered as scheduled.",
        "2024-09-17T10:30:00Z",
    ),
    (
        "Bob Williams",
        "Dr. Brown",
        "Assisted with physical therapy exercises.",
        "2024-09-17T11:45:00Z",
    ),
];
