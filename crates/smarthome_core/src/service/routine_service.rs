//! Routine use-case service.
//!
//! # Responsibility
//! - Provide storage-agnostic CRUD entry points for routines.
//! - Emit metadata-only diagnostics for every mutation.
//!
//! # Invariants
//! - Routine names never reach the log.
//! - Zero affected rows on update/delete is reported, not raised.

use crate::model::routine::{RoutineId, RoutineTask};
use crate::repo::routine_repo::RoutineRepository;
use crate::repo::RepoResult;
use log::{debug, info};

/// Use-case service wrapper for routine persistence.
pub struct RoutineService<R: RoutineRepository> {
    repo: R,
}

impl<R: RoutineRepository> RoutineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new routine and returns its assigned id.
    pub fn create_routine(&self, task: &RoutineTask) -> RepoResult<RoutineId> {
        let id = self.repo.create_routine(task)?;
        info!("event=routine_create module=service status=ok id={id}");
        Ok(id)
    }

    pub fn list_routines(&self) -> RepoResult<Vec<RoutineTask>> {
        let routines = self.repo.list_routines()?;
        debug!(
            "event=routine_list module=service status=ok count={}",
            routines.len()
        );
        Ok(routines)
    }

    pub fn get_routine(&self, id: RoutineId) -> RepoResult<Option<RoutineTask>> {
        self.repo.get_routine(id)
    }

    /// Overwrites a stored routine. Returns affected rows (0 or 1).
    pub fn update_routine(&self, task: &RoutineTask) -> RepoResult<usize> {
        let changed = self.repo.update_routine(task)?;
        info!(
            "event=routine_update module=service status=ok id={} rows={changed}",
            task.id
        );
        Ok(changed)
    }

    /// Removes a stored routine. Returns affected rows (0 or 1).
    pub fn delete_routine(&self, id: RoutineId) -> RepoResult<usize> {
        let changed = self.repo.delete_routine(id)?;
        info!("event=routine_delete module=service status=ok id={id} rows={changed}");
        Ok(changed)
    }
}
