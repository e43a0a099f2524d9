//! Project board screen state: board selection and per-column task lists.

use crate::model::project::{BoardId, ProjectBoard, ProjectTask, TaskId, TaskStatus};
use crate::projects::{BoardProgress, ProjectError, ProjectResult, ProjectService};
use std::sync::Arc;

/// One rendered board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub tasks: Vec<ProjectTask>,
}

pub struct ProjectViewModel {
    service: Arc<ProjectService>,
    selected_board: Option<BoardId>,
    error: Option<ProjectError>,
}

impl ProjectViewModel {
    pub fn new(service: Arc<ProjectService>) -> Self {
        Self {
            service,
            selected_board: None,
            error: None,
        }
    }

    pub fn selected_board(&self) -> Option<ProjectBoard> {
        let selected = self.selected_board?;
        self.service
            .boards()
            .into_iter()
            .find(|board| board.id == selected)
    }

    /// Selects a board; falls back to the first unarchived board when
    /// `board_id` is `None`.
    pub fn select_board(&mut self, board_id: Option<BoardId>) {
        self.selected_board = board_id.or_else(|| {
            self.service
                .boards()
                .into_iter()
                .find(|board| !board.is_archived)
                .map(|board| board.id)
        });
    }

    /// Tasks of the selected board grouped by its columns, highest priority
    /// first within a column.
    pub fn columns(&self) -> Vec<BoardColumn> {
        let Some(board) = self.selected_board() else {
            return Vec::new();
        };
        let tasks = self.service.tasks_for_board(board.id);
        board
            .columns
            .iter()
            .map(|status| {
                let mut column: Vec<ProjectTask> = tasks
                    .iter()
                    .filter(|task| task.status == *status)
                    .cloned()
                    .collect();
                column.sort_by(|a, b| {
                    b.priority
                        .cmp(&a.priority)
                        .then_with(|| a.due_date.cmp(&b.due_date))
                });
                BoardColumn {
                    status: *status,
                    tasks: column,
                }
            })
            .collect()
    }

    pub fn progress(&mut self) -> Option<BoardProgress> {
        let board_id = self.selected_board?;
        let result = self.service.board_progress(board_id);
        self.capture(result).ok()
    }

    pub fn move_task(&mut self, task_id: TaskId, status: TaskStatus) -> ProjectResult<ProjectTask> {
        let result = self.service.move_task(task_id, status);
        self.capture(result)
    }

    pub fn refresh(&mut self) -> ProjectResult<()> {
        let result = self.service.load_all();
        let result = self.capture(result);
        if self.selected_board().is_none() {
            self.select_board(None);
        }
        result
    }

    pub fn error(&self) -> Option<&ProjectError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn capture<T>(&mut self, result: ProjectResult<T>) -> ProjectResult<T> {
        if let Err(err) = &result {
            self.error = Some(err.clone());
        }
        result
    }
}

