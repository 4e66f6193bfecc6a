use chrono::NaiveDate;
use client::{TaskApi, TaskStore};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasks_protocol::TaskSummary;
use uuid::Uuid;

use crate::{
    menu::{MenuItem, TaskMenu},
    modal::{CREATED_NOTICE, FormMode, TaskForm},
    view::{BoardView, Column, Counters},
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Board,
    Search,
}

pub struct App<A> {
    pub store: TaskStore<A>,
    pub view: BoardView,
    pub menu: TaskMenu,
    pub input_mode: InputMode,
    pub add_form: Option<TaskForm>,
    pub edit_form: Option<TaskForm>,
    pub pending_delete: Option<Uuid>,
    pub notice: Option<Notice>,
    pub today: NaiveDate,
    column: usize,
    row: usize,
    should_quit: bool,
}

impl<A: TaskApi> App<A> {
    pub fn new(store: TaskStore<A>, today: NaiveDate) -> Self {
        Self {
            store,
            view: BoardView::default(),
            menu: TaskMenu::default(),
            input_mode: InputMode::default(),
            add_form: None,
            edit_form: None,
            pending_delete: None,
            notice: None,
            today,
            column: 0,
            row: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn columns(&self) -> Vec<Column<'_>> {
        self.view.columns(self.store.tasks())
    }

    pub fn counters(&self) -> Counters {
        Counters::compute(self.store.tasks(), self.today)
    }

    /// Focused column and row, clamped to what is currently visible.
    pub fn focus(&self) -> (usize, usize) {
        let columns = self.columns();
        if columns.is_empty() {
            return (0, 0);
        }
        let column = self.column.min(columns.len() - 1);
        let row = self.row.min(columns[column].tasks.len().saturating_sub(1));
        (column, row)
    }

    pub fn focused_task(&self) -> Option<&TaskSummary> {
        let (column, row) = self.focus();
        let columns = self.columns();
        columns
            .get(column)
            .and_then(|column| column.tasks.get(row))
            .copied()
    }

    pub fn active_form(&self) -> Option<&TaskForm> {
        self.add_form.as_ref().or(self.edit_form.as_ref())
    }

    pub async fn refresh(&mut self) {
        if let Err(err) = self.store.fetch_tasks().await {
            self.notice = Some(Notice::Error(format!("Could not load tasks: {err}")));
        }
    }

    pub fn open_add(&mut self) {
        self.menu.close();
        self.add_form = Some(TaskForm::add());
    }

    pub fn open_edit(&mut self) {
        self.menu.close();
        if let Some(task) = self.focused_task() {
            self.edit_form = Some(TaskForm::edit(task));
        }
    }

    pub fn request_delete(&mut self) {
        self.menu.close();
        self.pending_delete = self.focused_task().map(|task| task.id);
    }

    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.store.delete_task(id).await {
            Ok(()) => self.notice = Some(Notice::Info("Task deleted".to_string())),
            Err(err) => self.notice = Some(Notice::Error(format!("Could not delete task: {err}"))),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn submit_form(&mut self) {
        let today = self.today;
        let (form, adding) = match (self.add_form.as_mut(), self.edit_form.as_mut()) {
            (Some(form), _) => (form, true),
            (None, Some(form)) => (form, false),
            (None, None) => return,
        };

        match form.submit(&mut self.store, today).await {
            Ok(_) => {
                if adding {
                    self.add_form = None;
                    self.notice = Some(Notice::Info(CREATED_NOTICE.to_string()));
                } else {
                    self.edit_form = None;
                    self.notice = Some(Notice::Info("Task updated".to_string()));
                }
            }
            Err(err) => self.notice = Some(Notice::Error(err.to_string())),
        }
    }

    fn close_form(&mut self) {
        self.add_form = None;
        self.edit_form = None;
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete().await,
                KeyCode::Char('n') | KeyCode::Esc => self.cancel_delete(),
                _ => {}
            }
            return;
        }

        if self.active_form().is_some() {
            self.handle_form_key(key).await;
            return;
        }

        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Board,
                KeyCode::Backspace => {
                    self.view.search.pop();
                }
                KeyCode::Char(c) => self.view.search.push(c),
                _ => {}
            }
            self.row = 0;
            return;
        }

        if self.menu.is_open() {
            match key.code {
                KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                    self.menu.move_highlight()
                }
                KeyCode::Enter => match self.menu.choose() {
                    Some(MenuItem::Edit) => self.open_edit(),
                    Some(MenuItem::Delete) => self.request_delete(),
                    None => {}
                },
                KeyCode::Esc | KeyCode::Char('m') => self.menu.close(),
                _ => {}
            }
            return;
        }

        self.notice = None;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('f') => {
                self.view.filter = self.view.filter.next();
                self.column = 0;
                self.row = 0;
            }
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') => self.open_edit(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Enter | KeyCode::Char('m') => {
                if self.focused_task().is_some() {
                    self.menu.toggle();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let (column, _) = self.focus();
                self.column = column.saturating_sub(1);
                self.row = 0;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let (column, _) = self.focus();
                self.column = (column + 1).min(self.columns().len().saturating_sub(1));
                self.row = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let (column, row) = self.focus();
                self.column = column;
                self.row = row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let (column, row) = self.focus();
                self.column = column;
                self.row = row + 1;
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.close_form();
                return;
            }
            KeyCode::Enter => {
                self.submit_form().await;
                return;
            }
            _ => {}
        }

        let Some(form) = self.add_form.as_mut().or(self.edit_form.as_mut()) else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right => {
                if form.focus == crate::modal::FormField::Status {
                    form.cycle_status();
                }
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input(c),
            _ => {}
        }
    }

    pub fn form_mode(&self) -> Option<FormMode> {
        self.active_form().map(|form| form.mode)
    }
}
