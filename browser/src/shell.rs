use crate::albums::{self, AlbumsView};
use crate::photo_paths::{self, PhotoPathsView};
use crate::photographs::{self, DatePath, PhotographsView};
use crate::GroupingMode;
use api_client::ApiClient;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Photographs,
    PhotoPaths,
    Albums,
}

#[derive(Debug, Clone)]
pub enum Message {
    SwitchTab(Tab),
    Photographs(photographs::Message),
    PhotoPaths(photo_paths::Message),
    Albums(albums::Message),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Photographs(photographs::Task),
    PhotoPaths(photo_paths::Task),
    Albums(albums::Task),
}

impl Task {
    pub async fn perform(self, client: &ApiClient) -> Message {
        match self {
            Task::Photographs(task) => Message::Photographs(task.perform(client).await),
            Task::PhotoPaths(task) => Message::PhotoPaths(task.perform(client).await),
            Task::Albums(task) => Message::Albums(task.perform(client).await),
        }
    }
}

/// The three views behind a tab switcher.
#[derive(Debug, Default)]
pub struct Shell {
    active: Tab,
    photographs: PhotographsView,
    photo_paths: PhotoPathsView,
    albums: AlbumsView,
}

impl Shell {
    pub fn new(mode: GroupingMode) -> Self {
        Shell {
            active: Tab::default(),
            photographs: PhotographsView::new(mode),
            photo_paths: PhotoPathsView::new(mode),
            albums: AlbumsView::new(),
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn photographs(&self) -> &PhotographsView {
        &self.photographs
    }

    pub fn photo_paths(&self) -> &PhotoPathsView {
        &self.photo_paths
    }

    pub fn albums(&self) -> &AlbumsView {
        &self.albums
    }

    /// Route `message` to its view. Switching to a tab that never loaded
    /// starts its first load.
    pub fn update(&mut self, message: Message) -> Option<Task> {
        match message {
            Message::SwitchTab(tab) => {
                self.active = tab;
                match tab {
                    Tab::Photographs if self.photographs.state().is_idle() => self
                        .photographs
                        .update(photographs::Message::Jump(DatePath::Root))
                        .map(Task::Photographs),
                    Tab::PhotoPaths if self.photo_paths.state().is_idle() => self
                        .photo_paths
                        .update(photo_paths::Message::Jump(String::new()))
                        .map(Task::PhotoPaths),
                    Tab::Albums if self.albums.state().is_idle() => self
                        .albums
                        .update(albums::Message::Refresh)
                        .map(Task::Albums),
                    _ => None,
                }
            }
            Message::Photographs(m) => self.photographs.update(m).map(Task::Photographs),
            Message::PhotoPaths(m) => self.photo_paths.update(m).map(Task::PhotoPaths),
            Message::Albums(m) => self.albums.update(m).map(Task::Albums),
        }
    }

    /// Apply `messages` in order, running every resulting task on the runtime
    /// until none is pending. Results may arrive in any order; a task that
    /// panics or is cancelled is logged and counts as finished.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip_all))]
    pub async fn drive<I>(&mut self, client: Arc<ApiClient>, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        let mut tasks = JoinSet::new();
        for message in messages {
            self.dispatch(message, &client, &mut tasks);
        }
        settle(&mut tasks, |message, tasks| self.dispatch(message, &client, tasks)).await;
        tracing::debug!("No tasks pending");
    }

    fn dispatch(
        &mut self,
        message: Message,
        client: &Arc<ApiClient>,
        tasks: &mut JoinSet<Message>,
    ) {
        if let Some(task) = self.update(message) {
            let client = Arc::clone(client);
            tasks.spawn(async move { task.perform(&client).await });
        }
    }
}

/// Feed every finished task's message to `apply` until the set is empty.
async fn settle<F>(tasks: &mut JoinSet<Message>, mut apply: F)
where
    F: FnMut(Message, &mut JoinSet<Message>),
{
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(message) => apply(message, tasks),
            Err(e) => tracing::warn!(error = %e, "Task ended without a result"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_tab_loads_once() {
        let mut shell = Shell::new(GroupingMode::Server);
        assert!(matches!(
            shell.update(Message::SwitchTab(Tab::Albums)),
            Some(Task::Albums(albums::Task::Fetch(_)))
        ));
        assert_eq!(shell.active(), Tab::Albums);
        // Still loading: no second request
        assert!(shell.update(Message::SwitchTab(Tab::Albums)).is_none());

        assert!(matches!(
            shell.update(Message::SwitchTab(Tab::PhotoPaths)),
            Some(Task::PhotoPaths(photo_paths::Task::FetchLevel(_, ref p))) if p.is_empty()
        ));
        assert!(matches!(
            shell.update(Message::SwitchTab(Tab::Photographs)),
            Some(Task::Photographs(photographs::Task::FetchYears(_)))
        ));
    }
    async fn failing_task() -> Message {
        panic!("task failed")
    }

    #[tokio::test]
    async fn test_settle_survives_a_panicking_task() {
        let mut tasks = JoinSet::new();
        tasks.spawn(failing_task());
        tasks.spawn(async { Message::SwitchTab(Tab::Albums) });

        let mut applied = Vec::new();
        settle(&mut tasks, |message, _| applied.push(message)).await;
        assert_eq!(applied.len(), 1);
        assert!(matches!(applied[0], Message::SwitchTab(Tab::Albums)));
        assert!(tasks.is_empty());
    }
}
