use std::cmp::Reverse;
use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{Connection, Row};
use tracing::warn;
use uuid::Uuid;

use civic_types::models::{Complaint, User};

use crate::Database;
use crate::models::{ComplaintRow, UserRow, VoteRow, parse_uuid};

const COMPLAINT_COLUMNS: &str = "id, user_id, user_name, title, description, category, status, \
     assigned_department, latitude, longitude, address, image, created_at";

impl Database {
    // -- Complaints --

    /// Every decodable complaint, newest first.
    pub fn list_complaints(&self) -> Result<Vec<Complaint>> {
        self.with_conn(load_complaints)
    }

    pub fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
        self.with_conn(|conn| load_complaint(conn, id))
    }

    /// Whole-record write: inserts, or replaces the mutable fields and the
    /// voter set of an existing complaint.
    pub fn put_complaint(&self, complaint: &Complaint) -> Result<()> {
        self.transaction(|conn| store_complaint(conn, complaint))
    }

    // -- Users --

    /// Every decodable user in registration order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(load_users)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| load_user(conn, id))
    }

    pub fn put_user(&self, user: &User) -> Result<()> {
        self.with_conn(|conn| store_user(conn, user))
    }
}

pub fn load_complaints(conn: &Connection) -> Result<Vec<Complaint>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY id"
    ))?;
    let rows = stmt
        .query_map([], complaint_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // One pass over the vote table instead of a query per complaint.
    let mut votes: HashMap<String, Vec<Uuid>> = HashMap::new();
    for vote in load_all_votes(conn)? {
        match parse_uuid(&vote.user_id) {
            Ok(user_id) => votes.entry(vote.complaint_id).or_default().push(user_id),
            Err(e) => warn!("Skipping vote on complaint '{}': {}", vote.complaint_id, e),
        }
    }

    let mut complaints: Vec<Complaint> = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            let voted_by = votes.remove(&id).unwrap_or_default();
            row.into_complaint(voted_by)
                .map_err(|e| warn!("Skipping corrupt complaint '{}': {}", id, e))
                .ok()
        })
        .collect();

    // Legacy rows store "YYYY-MM-DD HH:MM:SS", so the text column does not
    // sort chronologically. Order on the decoded instant instead.
    complaints.sort_by_key(|c| Reverse(c.created_at));
    Ok(complaints)
}

pub fn load_complaint(conn: &Connection, id: Uuid) -> Result<Option<Complaint>> {
    let key = id.to_string();
    let row = conn
        .query_row(
            &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"),
            [&key],
            complaint_row,
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let voted_by = load_voters(conn, &key)?;
    match row.into_complaint(voted_by) {
        Ok(complaint) => Ok(Some(complaint)),
        Err(e) => {
            warn!("Complaint '{}' is unreadable: {}", key, e);
            Ok(None)
        }
    }
}

/// Callers that need the upsert and the voter rewrite to land together must
/// run this inside [`Database::transaction`].
pub fn store_complaint(conn: &Connection, complaint: &Complaint) -> Result<()> {
    let row = ComplaintRow::from_complaint(complaint);

    // user_id, user_name and created_at are fixed at creation.
    conn.execute(
        "INSERT INTO complaints (id, user_id, user_name, title, description, category, status,
                                 assigned_department, latitude, longitude, address, image,
                                 created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             description = excluded.description,
             category = excluded.category,
             status = excluded.status,
             assigned_department = excluded.assigned_department,
             latitude = excluded.latitude,
             longitude = excluded.longitude,
             address = excluded.address,
             image = excluded.image",
        rusqlite::params![
            row.id,
            row.user_id,
            row.user_name,
            row.title,
            row.description,
            row.category,
            row.status,
            row.assigned_department,
            row.latitude,
            row.longitude,
            row.address,
            row.image,
            row.created_at,
        ],
    )?;

    if load_voters(conn, &row.id)? != complaint.voted_by {
        conn.execute("DELETE FROM complaint_votes WHERE complaint_id = ?1", [&row.id])?;
        for user_id in &complaint.voted_by {
            insert_vote(conn, complaint.id, *user_id)?;
        }
    }

    Ok(())
}

/// Records a vote. Returns `false` when the user had already voted on this
/// complaint, leaving the table untouched.
pub fn insert_vote(conn: &Connection, complaint_id: Uuid, user_id: Uuid) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO complaint_votes (complaint_id, user_id) VALUES (?1, ?2)",
        (complaint_id.to_string(), user_id.to_string()),
    )?;
    Ok(inserted == 1)
}

pub fn load_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, name, email, role, reward_points FROM users ORDER BY rowid")?;
    let rows = stmt
        .query_map([], user_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let users = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            row.into_user()
                .map_err(|e| warn!("Skipping corrupt user '{}': {}", id, e))
                .ok()
        })
        .collect();

    Ok(users)
}

pub fn load_user(conn: &Connection, id: Uuid) -> Result<Option<User>> {
    let key = id.to_string();
    let row = conn
        .query_row(
            "SELECT id, name, email, role, reward_points FROM users WHERE id = ?1",
            [&key],
            user_row,
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    match row.into_user() {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            warn!("User '{}' is unreadable: {}", key, e);
            Ok(None)
        }
    }
}

pub fn store_user(conn: &Connection, user: &User) -> Result<()> {
    let row = UserRow::from_user(user)?;
    conn.execute(
        "INSERT INTO users (id, name, email, role, reward_points) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             email = excluded.email,
             reward_points = excluded.reward_points",
        rusqlite::params![row.id, row.name, row.email, row.role, row.reward_points],
    )?;
    Ok(())
}

fn load_voters(conn: &Connection, complaint_id: &str) -> Result<Vec<Uuid>> {
    let mut stmt =
        conn.prepare("SELECT user_id FROM complaint_votes WHERE complaint_id = ?1 ORDER BY seq")?;
    let ids = stmt
        .query_map([complaint_id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ids
        .iter()
        .filter_map(|id| {
            parse_uuid(id)
                .map_err(|e| warn!("Skipping vote on complaint '{}': {}", complaint_id, e))
                .ok()
        })
        .collect())
}

fn load_all_votes(conn: &Connection) -> Result<Vec<VoteRow>> {
    let mut stmt = conn.prepare("SELECT complaint_id, user_id FROM complaint_votes ORDER BY seq")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(VoteRow {
                complaint_id: row.get(0)?,
                user_id: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn complaint_row(row: &Row<'_>) -> rusqlite::Result<ComplaintRow> {
    Ok(ComplaintRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        status: row.get(6)?,
        assigned_department: row.get(7)?,
        latitude: row.get(8)?,
        longitude: row.get(9)?,
        address: row.get(10)?,
        image: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        reward_points: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use civic_types::models::{Category, ComplaintStatus, Location, Role};

    fn complaint(title: &str, day: u32) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Meera".into(),
            title: title.into(),
            description: "Streetlight out since Monday".into(),
            category: Category::Electricity,
            status: ComplaintStatus::Open,
            assigned_department: None,
            location: Location {
                latitude: 19.07,
                longitude: 72.87,
            },
            address: "Linking Road".into(),
            image: None,
            voted_by: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
        }
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.org", name.to_lowercase()),
            role: Role::Citizen,
            reward_points: 0,
        }
    }

    #[test]
    fn put_then_get_returns_the_same_complaint() {
        let db = Database::open_in_memory().unwrap();
        let mut c = complaint("Dark street", 1);
        c.voted_by = vec![Uuid::new_v4(), Uuid::new_v4()];
        c.image = Some("https://img.example.org/1.jpg".into());

        db.put_complaint(&c).unwrap();

        assert_eq!(db.get_complaint(c.id).unwrap(), Some(c));
    }

    #[test]
    fn get_missing_complaint_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_complaint(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first_with_voters_attached() {
        let db = Database::open_in_memory().unwrap();
        let older = complaint("Older", 1);
        let mut newer = complaint("Newer", 2);
        let voter = Uuid::new_v4();
        newer.voted_by = vec![voter];

        db.put_complaint(&older).unwrap();
        db.put_complaint(&newer).unwrap();

        let listed = db.list_complaints().unwrap();
        let titles: Vec<_> = listed.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert_eq!(listed[0].voted_by, vec![voter]);
        assert!(listed[1].voted_by.is_empty());
    }

    #[test]
    fn legacy_timestamps_sort_by_instant_not_text() {
        let db = Database::open_in_memory().unwrap();
        // Stored as 2024-01-01T09:00:00.000Z, which sorts after the legacy text.
        let rfc = complaint("RFC 09:00", 1);
        db.put_complaint(&rfc).unwrap();

        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO complaints (id, user_id, user_name, title, description, category,
                                         status, latitude, longitude, created_at)
                 VALUES (?1, ?2, 'x', 'Legacy 10:00', 'd', 'Roads', 'open', 0, 0,
                         '2024-01-01 10:00:00')",
                (Uuid::new_v4().to_string(), Uuid::new_v4().to_string()),
            )?;
            Ok(())
        })
        .unwrap();

        let listed = db.list_complaints().unwrap();
        let titles: Vec<_> = listed.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Legacy 10:00", "RFC 09:00"]);
    }

    #[test]
    fn put_keeps_creation_fields_immutable() {
        let db = Database::open_in_memory().unwrap();
        let original = complaint("Leak", 3);
        db.put_complaint(&original).unwrap();

        let mut rewritten = original.clone();
        rewritten.user_name = "Someone else".into();
        rewritten.created_at = Utc::now();
        rewritten.status = ComplaintStatus::Assigned;
        db.put_complaint(&rewritten).unwrap();

        let stored = db.get_complaint(original.id).unwrap().unwrap();
        assert_eq!(stored.user_name, original.user_name);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.status, ComplaintStatus::Assigned);
    }

    #[test]
    fn voter_order_survives_a_rewrite() {
        let db = Database::open_in_memory().unwrap();
        let mut c = complaint("Garbage pile", 4);
        let voters: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        c.voted_by = voters.clone();
        db.put_complaint(&c).unwrap();

        c.voted_by.remove(1);
        db.put_complaint(&c).unwrap();

        let stored = db.get_complaint(c.id).unwrap().unwrap();
        assert_eq!(stored.voted_by, vec![voters[0], voters[2], voters[3]]);
    }

    #[test]
    fn insert_vote_rejects_duplicates() {
        let db = Database::open_in_memory().unwrap();
        let c = complaint("Fallen tree", 5);
        db.put_complaint(&c).unwrap();
        let voter = Uuid::new_v4();

        let first = db.with_conn(|conn| insert_vote(conn, c.id, voter)).unwrap();
        let second = db.with_conn(|conn| insert_vote(conn, c.id, voter)).unwrap();

        assert!(first);
        assert!(!second);
        assert_eq!(db.get_complaint(c.id).unwrap().unwrap().votes(), 1);
    }

    #[test]
    fn corrupt_rows_are_skipped_not_fatal() {
        let db = Database::open_in_memory().unwrap();
        let good = complaint("Readable", 6);
        db.put_complaint(&good).unwrap();

        let bad_id = Uuid::new_v4();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO complaints (id, user_id, user_name, title, description, category,
                                         status, latitude, longitude, created_at)
                 VALUES (?1, ?2, 'x', 'Bad date', 'd', 'Roads', 'open', 0, 0, 'not a date')",
                (bad_id.to_string(), Uuid::new_v4().to_string()),
            )?;
            Ok(())
        })
        .unwrap();

        let listed = db.list_complaints().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, good.id);
        assert!(db.get_complaint(bad_id).unwrap().is_none());
    }

    #[test]
    fn users_list_in_registration_order() {
        let db = Database::open_in_memory().unwrap();
        let a = user("Anil");
        let b = user("Bina");
        db.put_user(&a).unwrap();
        db.put_user(&b).unwrap();

        let mut a_richer = a.clone();
        a_richer.reward_points = 30;
        db.put_user(&a_richer).unwrap();

        let listed = db.list_users().unwrap();
        assert_eq!(listed, vec![a_richer.clone(), b]);
        assert_eq!(db.get_user(a.id).unwrap(), Some(a_richer));
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let c = complaint("Rollback", 7);

        let result: Result<()> = db.transaction(|conn| {
            store_complaint(conn, &c)?;
            Err(anyhow::anyhow!("abort"))
        });

        assert!(result.is_err());
        assert!(db.get_complaint(c.id).unwrap().is_none());
    }

    #[test]
    fn close_releases_the_store() {
        let db = Database::open_in_memory().unwrap();
        db.put_user(&user("Chitra")).unwrap();
        db.close().unwrap();
    }
}
