//! Album list with create, update and delete.

use crate::{Load, Ticket, Tickets};
use api_client::{Album, AlbumPatch, ApiClient, NewAlbum, Photograph};
use hierarchy::common_albums;

#[derive(Debug, Clone)]
pub enum Message {
    Refresh,
    Loaded(Ticket, Result<Vec<Album>, String>),
    Create(NewAlbum),
    Update(u64, AlbumPatch),
    Delete(u64),
    /// A mutation finished; the list is reloaded either way.
    Changed(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Fetch(Ticket),
    Create(NewAlbum),
    Update(u64, AlbumPatch),
    Delete(u64),
}

impl Task {
    pub async fn perform(self, client: &ApiClient) -> Message {
        match self {
            Task::Fetch(ticket) => {
                Message::Loaded(ticket, client.list_albums().await.map_err(|e| e.to_string()))
            }
            Task::Create(album) => Message::Changed(
                client
                    .create_album(&album)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            ),
            Task::Update(id, patch) => Message::Changed(
                client
                    .update_album(id, &patch)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            ),
            Task::Delete(id) => {
                Message::Changed(client.delete_album(id).await.map_err(|e| e.to_string()))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AlbumsView {
    tickets: Tickets,
    state: Load<Vec<Album>>,
    /// Error of the last mutation, kept next to the reloaded list.
    last_error: Option<String>,
}

impl AlbumsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Load<Vec<Album>> {
        &self.state
    }

    pub fn albums(&self) -> &[Album] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Albums shared by every photograph in `selected`.
    pub fn common_to<'a>(&self, selected: impl IntoIterator<Item = &'a Photograph>) -> Vec<&Album> {
        common_albums(self.albums(), selected)
    }

    pub fn update(&mut self, message: Message) -> Option<Task> {
        match message {
            Message::Refresh => self.load(),
            Message::Loaded(ticket, result) => {
                if !self.tickets.is_current(ticket) {
                    tracing::debug!(?ticket, "Discarding superseded album list");
                    return None;
                }
                self.state = match result {
                    Ok(albums) if albums.is_empty() => Load::Empty,
                    Ok(albums) => Load::Ready(albums),
                    Err(e) => Load::Failed(e),
                };
                None
            }
            Message::Create(album) => Some(Task::Create(album)),
            Message::Update(_, patch) if patch.is_empty() => None,
            Message::Update(id, patch) => Some(Task::Update(id, patch)),
            Message::Delete(id) => Some(Task::Delete(id)),
            Message::Changed(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Album change failed");
                }
                self.last_error = result.err();
                self.load()
            }
        }
    }

    fn load(&mut self) -> Option<Task> {
        self.state = Load::Loading;
        Some(Task::Fetch(self.tickets.issue()))
    }
}
