use super::Club;
use crate::error::Result;
use crate::models::{new_id, require_text, Expedition, NewTask, Profile, Task, TaskPatch, TaskStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// An expedition's tasks split into board columns, in board order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskBoard {
    pub columns: Vec<TaskColumn>,
}

impl TaskBoard {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: Vec<TaskColumn> = TaskStatus::COLUMNS
            .iter()
            .map(|&status| TaskColumn {
                status,
                tasks: Vec::new(),
            })
            .collect();
        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.tasks.as_slice())
            .unwrap_or_default()
    }
}

impl Club {
    fn check_assignee(&self, assignee: Option<&str>) -> Result<()> {
        match assignee.filter(|a| !a.is_empty()) {
            Some(id) => self.storage.require::<Profile>(id).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn create_task(&self, expedition_id: &str, new: NewTask) -> Result<Task> {
        self.storage.require::<Expedition>(expedition_id)?;
        require_text("title", &new.title)?;
        self.check_assignee(new.assigned_to.as_deref())?;

        let task = new.into_task(new_id("task"), expedition_id.to_string());
        self.storage.put(&task)?;
        tracing::debug!(expedition = %expedition_id, task = %task.id, "Created task {}", task.title);
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.storage.require(id)
    }

    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut task: Task = self.storage.require(id)?;
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        self.check_assignee(patch.assigned_to.as_deref())?;
        patch.apply(&mut task);
        self.storage.put(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        self.storage.require::<Task>(id)?;
        self.storage.delete::<Task>(id)
    }

    pub fn task_board(&self, expedition_id: &str) -> Result<TaskBoard> {
        self.storage.require::<Expedition>(expedition_id)?;
        let tasks = self
            .storage
            .list_where(|t: &Task| t.expedition_id == expedition_id)?;
        Ok(TaskBoard::from_tasks(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{club, member, trip};
    use super::*;
    use crate::error::Error;
    use crate::models::{TaskCategory, TaskPriority};

    fn task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            assigned_to: None,
            status: TaskStatus::Fazer,
            priority: TaskPriority::Media,
            category: TaskCategory::Compras,
            due_date: None,
        }
    }

    #[test]
    fn board_groups_by_column() {
        let (_dir, club) = club();
        let exp = trip(&club, &[]);
        let a = club.create_task(&exp, task("Iscas")).unwrap();
        club.create_task(&exp, task("Gelo")).unwrap();

        club.update_task(
            &a.id,
            TaskPatch {
                status: Some(TaskStatus::EmAndamento),
                ..Default::default()
            },
        )
        .unwrap();

        let board = club.task_board(&exp).unwrap();
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.column(TaskStatus::Fazer).len(), 1);
        assert_eq!(board.column(TaskStatus::EmAndamento)[0].title, "Iscas");
        assert!(board.column(TaskStatus::Concluido).is_empty());
    }

    #[test]
    fn assignee_must_exist() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", false);
        let exp = trip(&club, &[&ana]);

        let mut new = task("Barco");
        new.assigned_to = Some("ghost".into());
        assert!(matches!(club.create_task(&exp, new), Err(Error::NotFound(_))));

        let mut new = task("Barco");
        new.assigned_to = Some(ana.clone());
        let created = club.create_task(&exp, new).unwrap();
        assert_eq!(created.assigned_to, Some(ana));

        club.delete_task(&created.id).unwrap();
        assert!(matches!(club.get_task(&created.id), Err(Error::NotFound(_))));
    }
}
