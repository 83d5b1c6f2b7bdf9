use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::database::{DatabaseError, Student, StudentStore};

/// In-process [`StudentStore`] for tests.
///
/// Rows keep insertion order, which stands in for storage order. Flip
/// [`MemoryStudentStore::set_failing`] to make every call fail the way an
/// unreachable database would.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    rows: Mutex<Vec<Student>>,
    failing: AtomicBool,
    writes: Mutex<usize>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        let store = Self::new();
        store.lock_rows().extend(students);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock_rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful insert/update/delete calls
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<Student>> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn record_write(&self) {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner()) += 1;
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn exists(&self, student_id: &str) -> Result<bool, DatabaseError> {
        self.check()?;
        Ok(self.lock_rows().iter().any(|s| s.student_id == student_id))
    }

    async fn get_by_id(&self, student_id: &str) -> Result<Option<Student>, DatabaseError> {
        self.check()?;
        Ok(self.lock_rows().iter().find(|s| s.student_id == student_id).cloned())
    }

    async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<Student>, DatabaseError> {
        self.check()?;
        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(self.lock_rows().iter().skip(skip).take(take).cloned().collect())
    }

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError> {
        self.check()?;
        let mut rows = self.lock_rows();
        // Mirrors the primary key constraint
        if rows.iter().any(|s| s.student_id == student.student_id) {
            return Err(DatabaseError::Unavailable(format!(
                "duplicate key value violates unique constraint: {}",
                student.student_id
            )));
        }
        rows.push(student.clone());
        drop(rows);
        self.record_write();
        Ok(())
    }

    async fn update(&self, student: &Student) -> Result<(), DatabaseError> {
        self.check()?;
        let mut rows = self.lock_rows();
        let row = rows
            .iter_mut()
            .find(|s| s.student_id == student.student_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("students/{}", student.student_id)))?;
        *row = student.clone();
        drop(rows);
        self.record_write();
        Ok(())
    }

    async fn delete(&self, student_id: &str) -> Result<(), DatabaseError> {
        self.check()?;
        let mut rows = self.lock_rows();
        let before = rows.len();
        rows.retain(|s| s.student_id != student_id);
        if rows.len() == before {
            return Err(DatabaseError::NotFound(format!("students/{}", student_id)));
        }
        drop(rows);
        self.record_write();
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check()
    }
}
