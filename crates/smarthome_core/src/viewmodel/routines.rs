//! Routines screen view-model.
//!
//! # Responsibility
//! - Hold the in-memory routine snapshot shown by the routines screen.
//! - Turn user intents into store calls and editor/dialog state changes.
//!
//! # Invariants
//! - After every successful create/update/delete the whole list is re-read
//!   from the store and replaces the snapshot. Nothing is patched in place.
//! - A failed store call leaves the previous snapshot untouched.
//! - Once a write lands, the editor and selection it consumed are cleared
//!   even if the following re-read fails, so a retry cannot repeat it.
//! - Blank names are rejected here, before the store is reached; the editor
//!   stays open with the user's input.

use crate::model::routine::{Recurrence, RoutineId, RoutineTask, RoutineValidationError};
use crate::model::settings::Theme;
use crate::repo::routine_repo::RoutineRepository;
use crate::repo::RepoError;
use crate::service::routine_service::RoutineService;
use crate::service::theme::ThemeHandle;
use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editable fields of the add/edit sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineForm {
    /// `0` while adding; the edited routine id otherwise.
    pub id: RoutineId,
    pub name: String,
    pub time: NaiveTime,
    pub recurrence: Recurrence,
}

impl RoutineForm {
    /// Empty form for a new routine. `now` pre-fills the time picker.
    pub fn blank(now: NaiveTime) -> Self {
        Self {
            id: 0,
            name: String::new(),
            time: now,
            recurrence: Recurrence::default(),
        }
    }

    pub fn from_task(task: &RoutineTask) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            time: task.time,
            recurrence: task.recurrence.clone(),
        }
    }

    pub fn to_task(&self) -> RoutineTask {
        RoutineTask {
            id: self.id,
            name: self.name.clone(),
            time: self.time,
            recurrence: self.recurrence.clone(),
        }
    }
}

/// Add/edit sheet state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Adding(RoutineForm),
    Editing(RoutineForm),
}

impl EditorState {
    pub fn form(&self) -> Option<&RoutineForm> {
        match self {
            Self::Closed => None,
            Self::Adding(form) | Self::Editing(form) => Some(form),
        }
    }

    fn form_mut(&mut self) -> Option<&mut RoutineForm> {
        match self {
            Self::Closed => None,
            Self::Adding(form) | Self::Editing(form) => Some(form),
        }
    }
}

/// Immutable snapshot rendered by the routines screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutinesState {
    pub routines: Vec<RoutineTask>,
    pub editor: EditorState,
    /// Routine whose edit/delete options dialog is open.
    pub selected: Option<RoutineId>,
    pub theme: Theme,
    pub loaded: bool,
}

impl RoutinesState {
    /// True when the "no routines yet" placeholder should show.
    pub fn is_empty_hint(&self) -> bool {
        self.loaded && self.routines.is_empty()
    }
}

/// User intents accepted by [`RoutinesViewModel::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutinesIntent {
    /// Initial display: read the full list once.
    Load,
    /// Add button.
    OpenAdd { now: NaiveTime },
    /// Tap on a routine card.
    Select(RoutineId),
    DismissOptions,
    EditSelected,
    DeleteSelected,
    SetName(String),
    SetTime(NaiveTime),
    SetRecurrence(Recurrence),
    Save,
    CloseEditor,
    /// The shared theme changed; take a fresh copy.
    ThemeChanged,
}

#[derive(Debug)]
pub enum RoutinesError {
    Validation(RoutineValidationError),
    Repo(RepoError),
    /// Intent needs an open add/edit sheet.
    EditorClosed,
    /// Intent needs an open options dialog.
    NoSelection,
    /// Routine is not present in the store.
    UnknownRoutine(RoutineId),
}

impl Display for RoutinesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::EditorClosed => write!(f, "routine editor is not open"),
            Self::NoSelection => write!(f, "no routine selected"),
            Self::UnknownRoutine(id) => write!(f, "routine not found: {id}"),
        }
    }
}

impl Error for RoutinesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RoutinesError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<RoutineValidationError> for RoutinesError {
    fn from(value: RoutineValidationError) -> Self {
        Self::Validation(value)
    }
}

pub struct RoutinesViewModel<R: RoutineRepository> {
    service: RoutineService<R>,
    theme: ThemeHandle,
    state: RoutinesState,
}

impl<R: RoutineRepository> RoutinesViewModel<R> {
    pub fn new(repo: R, theme: ThemeHandle) -> Self {
        let state = RoutinesState {
            theme: theme.current(),
            ..RoutinesState::default()
        };
        Self {
            service: RoutineService::new(repo),
            theme,
            state,
        }
    }

    pub fn state(&self) -> &RoutinesState {
        &self.state
    }

    /// Applies one intent and returns the resulting snapshot.
    pub fn dispatch(&mut self, intent: RoutinesIntent) -> Result<&RoutinesState, RoutinesError> {
        match intent {
            RoutinesIntent::Load => {
                self.refresh()?;
                self.state.loaded = true;
            }
            RoutinesIntent::OpenAdd { now } => {
                self.state.selected = None;
                self.state.editor = EditorState::Adding(RoutineForm::blank(now));
            }
            RoutinesIntent::Select(id) => {
                if !self.state.routines.iter().any(|task| task.id == id) {
                    return Err(RoutinesError::UnknownRoutine(id));
                }
                self.state.selected = Some(id);
            }
            RoutinesIntent::DismissOptions => self.state.selected = None,
            RoutinesIntent::EditSelected => self.edit_selected()?,
            RoutinesIntent::DeleteSelected => self.delete_selected()?,
            RoutinesIntent::SetName(name) => self.form_mut()?.name = name,
            RoutinesIntent::SetTime(time) => self.form_mut()?.time = time,
            RoutinesIntent::SetRecurrence(recurrence) => self.form_mut()?.recurrence = recurrence,
            RoutinesIntent::Save => self.save()?,
            RoutinesIntent::CloseEditor => self.state.editor = EditorState::Closed,
            RoutinesIntent::ThemeChanged => self.state.theme = self.theme.current(),
        }
        Ok(&self.state)
    }

    fn form_mut(&mut self) -> Result<&mut RoutineForm, RoutinesError> {
        self.state
            .editor
            .form_mut()
            .ok_or(RoutinesError::EditorClosed)
    }

    fn edit_selected(&mut self) -> Result<(), RoutinesError> {
        let id = self
            .state
            .selected
            .take()
            .ok_or(RoutinesError::NoSelection)?;
        match self.service.get_routine(id)? {
            Some(task) => {
                self.state.editor = EditorState::Editing(RoutineForm::from_task(&task));
                Ok(())
            }
            None => {
                self.refresh()?;
                Err(RoutinesError::UnknownRoutine(id))
            }
        }
    }

    fn delete_selected(&mut self) -> Result<(), RoutinesError> {
        let id = self.state.selected.ok_or(RoutinesError::NoSelection)?;
        self.service.delete_routine(id)?;
        self.state.selected = None;
        self.refresh()
    }

    fn save(&mut self) -> Result<(), RoutinesError> {
        let (task, editing) = match &self.state.editor {
            EditorState::Closed => return Err(RoutinesError::EditorClosed),
            EditorState::Adding(form) => (form.to_task(), false),
            EditorState::Editing(form) => (form.to_task(), true),
        };
        task.validate()?;

        if editing {
            self.service.update_routine(&task)?;
        } else {
            self.service.create_routine(&task)?;
        }
        self.state.editor = EditorState::Closed;
        self.refresh()
    }

    fn refresh(&mut self) -> Result<(), RoutinesError> {
        self.state.routines = self.service.list_routines()?;
        Ok(())
    }
}
