use async_trait::async_trait;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::student::{number_to_decimal, Student, StudentRow};

/// Persistence operations the student handlers depend on.
///
/// Every call is a single parameterized statement; nothing here spans a
/// transaction, so an `exists` check followed by a write is not atomic. The
/// primary key on `student_id` is the final uniqueness arbiter.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn exists(&self, student_id: &str) -> Result<bool, DatabaseError>;

    async fn get_by_id(&self, student_id: &str) -> Result<Option<Student>, DatabaseError>;

    /// Rows in storage order; no ORDER BY is applied.
    async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<Student>, DatabaseError>;

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError>;

    /// Replaces every mutable column of the row keyed by `student.student_id`.
    async fn update(&self, student: &Student) -> Result<(), DatabaseError>;

    async fn delete(&self, student_id: &str) -> Result<(), DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

const STUDENT_COLUMNS: &str =
    "student_id, name, date_of_birth, guardian_name, ph_no, email, address";

/// PostgreSQL-backed [`StudentStore`]
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseManager,
}

impl StudentRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentStore for StudentRepository {
    async fn exists(&self, student_id: &str) -> Result<bool, DatabaseError> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1)",
        )
        .bind(student_id)
        .fetch_one(self.db.pool())
        .await?;

        debug!("exists({}) = {}", student_id, found);
        Ok(found)
    }

    async fn get_by_id(&self, student_id: &str) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM students WHERE student_id = $1", STUDENT_COLUMNS);
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(student_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(Student::try_from).transpose()
    }

    async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM students LIMIT $1 OFFSET $2", STUDENT_COLUMNS);
        let students = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?
            .into_iter()
            .map(Student::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("get_page(limit={}, offset={}) -> {} rows", limit, offset, students.len());
        Ok(students)
    }

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError> {
        let ph_no = number_to_decimal(&student.ph_no)?;
        sqlx::query(
            "INSERT INTO students (student_id, name, date_of_birth, guardian_name, ph_no, email, address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&student.student_id)
        .bind(&student.name)
        .bind(&student.date_of_birth)
        .bind(&student.guardian_name)
        .bind(ph_no)
        .bind(&student.email)
        .bind(&student.address)
        .execute(self.db.pool())
        .await?;

        debug!("inserted student {}", student.student_id);
        Ok(())
    }

    async fn update(&self, student: &Student) -> Result<(), DatabaseError> {
        let ph_no = number_to_decimal(&student.ph_no)?;
        let result = sqlx::query(
            "UPDATE students
             SET name = $1, date_of_birth = $2, guardian_name = $3, ph_no = $4, email = $5, address = $6
             WHERE student_id = $7",
        )
        .bind(&student.name)
        .bind(&student.date_of_birth)
        .bind(&student.guardian_name)
        .bind(ph_no)
        .bind(&student.email)
        .bind(&student.address)
        .bind(&student.student_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("students/{}", student.student_id)));
        }
        debug!("updated student {}", student.student_id);
        Ok(())
    }

    async fn delete(&self, student_id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("students/{}", student_id)));
        }
        debug!("deleted student {}", student_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
