//! Project board and task use-case service.
//!
//! # Invariants
//! - A task is only created on, or moved to, a column its board displays.
//! - Deleting a board deletes its tasks first.

use crate::clock::Clock;
use crate::model::project::{BoardId, ProjectBoard, ProjectTask, TaskId, TaskStatus};
use crate::projects::error::{ProjectError, ProjectResult};
use crate::state::Published;
use crate::store::{delete_entity, load_entities, save_entity, DocumentStore};
use chrono::NaiveDate;
use log::{error, info};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Completion snapshot of one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardProgress {
    pub board_id: BoardId,
    pub total_tasks: usize,
    pub done_tasks: usize,
    /// `done / total * 100`, rounded to 2 dp; zero for an empty board.
    pub percent_complete: Decimal,
}

pub struct ProjectService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    boards: Published<Vec<ProjectBoard>>,
    tasks: Published<Vec<ProjectTask>>,
    error: Published<Option<ProjectError>>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            boards: Published::default(),
            tasks: Published::default(),
            error: Published::default(),
        }
    }

    pub fn boards(&self) -> Vec<ProjectBoard> {
        self.boards.get()
    }

    pub fn tasks(&self) -> Vec<ProjectTask> {
        self.tasks.get()
    }

    pub fn last_error(&self) -> Option<ProjectError> {
        self.error.get()
    }

    pub fn boards_state(&self) -> &Published<Vec<ProjectBoard>> {
        &self.boards
    }

    pub fn tasks_state(&self) -> &Published<Vec<ProjectTask>> {
        &self.tasks
    }

    pub fn error_state(&self) -> &Published<Option<ProjectError>> {
        &self.error
    }

    pub fn load_all(&self) -> ProjectResult<()> {
        self.track("project_fetch", || {
            let boards = load_entities::<ProjectBoard>(self.store.as_ref())?;
            let tasks = load_entities::<ProjectTask>(self.store.as_ref())?;
            info!(
                "event=project_fetch module=projects status=ok boards={} tasks={}",
                boards.len(),
                tasks.len()
            );
            self.boards.set(boards);
            self.tasks.set(tasks);
            Ok(())
        })
    }

    pub fn tasks_for_board(&self, board_id: BoardId) -> Vec<ProjectTask> {
        self.tasks.with(|tasks| {
            tasks
                .iter()
                .filter(|task| task.board_id == board_id)
                .cloned()
                .collect()
        })
    }

    pub fn create_board(&self, board: ProjectBoard) -> ProjectResult<ProjectBoard> {
        self.track("board_create", || {
            require_text(&board.name, "board name")?;
            if board.columns.is_empty() {
                return Err(ProjectError::InvalidData(
                    "board must display at least one column".to_string(),
                ));
            }
            if self.find_board(board.id).is_ok() {
                return Err(ProjectError::DuplicateIdentifier(board.id.to_string()));
            }
            save_entity(self.store.as_ref(), &board)?;
            self.boards.update(|boards| boards.push(board.clone()));
            info!(
                "event=board_create module=projects status=ok board_id={}",
                board.id
            );
            Ok(board)
        })
    }

    pub fn update_board(&self, board: ProjectBoard) -> ProjectResult<ProjectBoard> {
        self.track("board_update", || {
            require_text(&board.name, "board name")?;
            self.find_board(board.id)?;
            save_entity(self.store.as_ref(), &board)?;
            let updated = board.clone();
            self.boards.update(|boards| {
                if let Some(slot) = boards.iter_mut().find(|existing| existing.id == updated.id) {
                    *slot = updated;
                }
            });
            Ok(board)
        })
    }

    pub fn delete_board(&self, board_id: BoardId) -> ProjectResult<()> {
        self.track("board_delete", || {
            self.find_board(board_id)?;
            for task in self.tasks_for_board(board_id) {
                delete_entity::<ProjectTask>(self.store.as_ref(), &task.id.to_string())?;
                self.tasks
                    .update(|tasks| tasks.retain(|existing| existing.id != task.id));
            }
            delete_entity::<ProjectBoard>(self.store.as_ref(), &board_id.to_string())?;
            self.boards
                .update(|boards| boards.retain(|board| board.id != board_id));
            info!("event=board_delete module=projects status=ok board_id={board_id}");
            Ok(())
        })
    }

    pub fn create_task(&self, mut task: ProjectTask) -> ProjectResult<ProjectTask> {
        self.track("task_create", || {
            require_text(&task.title, "task title")?;
            let board = self.find_board(task.board_id)?;
            require_column(&board, task.status)?;
            if self.find_task(task.id).is_ok() {
                return Err(ProjectError::DuplicateIdentifier(task.id.to_string()));
            }
            let now = self.clock.now();
            task.created_at = now;
            task.updated_at = now;
            save_entity(self.store.as_ref(), &task)?;
            self.tasks.update(|tasks| tasks.push(task.clone()));
            info!(
                "event=task_create module=projects status=ok task_id={} board_id={}",
                task.id, task.board_id
            );
            Ok(task)
        })
    }

    pub fn update_task(&self, task: ProjectTask) -> ProjectResult<ProjectTask> {
        self.track("task_update", || {
            require_text(&task.title, "task title")?;
            self.find_task(task.id)?;
            let board = self.find_board(task.board_id)?;
            require_column(&board, task.status)?;
            self.persist_task(task)
        })
    }

    pub fn delete_task(&self, task_id: TaskId) -> ProjectResult<()> {
        self.track("task_delete", || {
            delete_entity::<ProjectTask>(self.store.as_ref(), &task_id.to_string())?;
            self.tasks
                .update(|tasks| tasks.retain(|task| task.id != task_id));
            Ok(())
        })
    }

    /// Moves a task to another column of its board.
    pub fn move_task(&self, task_id: TaskId, status: TaskStatus) -> ProjectResult<ProjectTask> {
        self.track("task_move", || {
            let mut task = self.find_task(task_id)?;
            let board = self.find_board(task.board_id)?;
            require_column(&board, status)?;
            let from = task.status;
            task.status = status;
            let task = self.persist_task(task)?;
            info!(
                "event=task_move module=projects status=ok task_id={task_id} from={} to={}",
                from.as_str(),
                status.as_str()
            );
            Ok(task)
        })
    }

    pub fn board_progress(&self, board_id: BoardId) -> ProjectResult<BoardProgress> {
        self.track("board_progress", || {
            self.find_board(board_id)?;
            let tasks = self.tasks_for_board(board_id);
            let done_tasks = tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Done)
                .count();
            let percent_complete = if tasks.is_empty() {
                Decimal::ZERO
            } else {
                (Decimal::from(done_tasks) / Decimal::from(tasks.len()) * Decimal::ONE_HUNDRED)
                    .round_dp(2)
            };
            Ok(BoardProgress {
                board_id,
                total_tasks: tasks.len(),
                done_tasks,
                percent_complete,
            })
        })
    }

    /// Open tasks whose due date is before `today`, earliest first.
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<ProjectTask> {
        let mut overdue: Vec<ProjectTask> = self.tasks.with(|tasks| {
            tasks
                .iter()
                .filter(|task| task.is_overdue(today))
                .cloned()
                .collect()
        });
        overdue.sort_by_key(|task| task.due_date);
        overdue
    }

    fn track<T>(
        &self,
        event: &str,
        operation: impl FnOnce() -> ProjectResult<T>,
    ) -> ProjectResult<T> {
        let result = operation();
        if let Err(err) = &result {
            error!(
                "event={event} module=projects status=error error_code={} error={err}",
                err.code()
            );
            self.error.set(Some(err.clone()));
        }
        result
    }

    fn persist_task(&self, mut task: ProjectTask) -> ProjectResult<ProjectTask> {
        task.updated_at = self.clock.now();
        save_entity(self.store.as_ref(), &task)?;
        let updated = task.clone();
        self.tasks.update(|tasks| {
            if let Some(slot) = tasks.iter_mut().find(|existing| existing.id == updated.id) {
                *slot = updated;
            }
        });
        Ok(task)
    }

    fn find_board(&self, board_id: BoardId) -> ProjectResult<ProjectBoard> {
        self.boards
            .with(|boards| boards.iter().find(|board| board.id == board_id).cloned())
            .ok_or_else(|| ProjectError::NotFound(format!("board {board_id}")))
    }

    fn find_task(&self, task_id: TaskId) -> ProjectResult<ProjectTask> {
        self.tasks
            .with(|tasks| tasks.iter().find(|task| task.id == task_id).cloned())
            .ok_or_else(|| ProjectError::NotFound(format!("task {task_id}")))
    }
}

fn require_text(value: &str, what: &str) -> ProjectResult<()> {
    if value.trim().is_empty() {
        return Err(ProjectError::InvalidData(format!("{what} must not be blank")));
    }
    Ok(())
}

fn require_column(board: &ProjectBoard, status: TaskStatus) -> ProjectResult<()> {
    if board.columns.contains(&status) {
        return Ok(());
    }
    Err(ProjectError::InvalidColumn(format!(
        "board {} has no {} column",
        board.name,
        status.as_str()
    )))
}
