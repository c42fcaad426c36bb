//! Task model - the expedition's kanban board.

use super::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Fazer,
    #[serde(rename = "Em Andamento")]
    EmAndamento,
    Pendente,
    #[serde(rename = "Concluído")]
    Concluido,
}

impl TaskStatus {
    /// Columns in board order.
    pub const COLUMNS: [TaskStatus; 4] = [
        TaskStatus::Fazer,
        TaskStatus::EmAndamento,
        TaskStatus::Pendente,
        TaskStatus::Concluido,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Baixa,
    #[serde(rename = "Média")]
    Media,
    Alta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Pesca,
    Acampamento,
    Compras,
    #[serde(rename = "Logística")]
    Logistica,
    Financeiro,
    Administrativo,
    Camisetas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub expedition_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Profile ID
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Concluido
    }
}

impl Record for Task {
    const PREFIX: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_date: Option<NaiveDate>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Fazer
}

fn default_priority() -> TaskPriority {
    TaskPriority::Media
}

impl NewTask {
    pub fn into_task(self, id: String, expedition_id: String) -> Task {
        Task {
            id,
            expedition_id,
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to.filter(|a| !a.is_empty()),
            status: self.status,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
        }
    }
}

/// Partial task update. Dragging a card to another column is a patch of `status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Empty string unassigns
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = Some(description);
        }
        if let Some(assigned) = self.assigned_to {
            task.assigned_to = Some(assigned).filter(|a| !a.is_empty());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
    }
}
