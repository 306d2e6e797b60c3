//! Photo paths browsed by directory.

use crate::{GroupingMode, Load, Ticket, Tickets};
use api_client::{ApiClient, DirectorySummary, PathFilter, PhotoPath};
use hierarchy::{sort_items, split_path, DirectoryEntry, PathTree, Selection, SortKey, SortOrder};

/// One breadcrumb: a directory name and the prefix that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub path: String,
}

/// Breadcrumbs for `path`, starting with the catalog root.
///
/// Prefixes are rebuilt with `/` whatever separator the input used; a leading
/// separator is kept so absolute paths stay absolute.
pub fn crumbs_for(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        name: "/".to_string(),
        path: String::new(),
    }];
    let mut prefix = if path.starts_with('/') || path.starts_with('\\') {
        "/".to_string()
    } else {
        String::new()
    };
    for (depth, segment) in split_path(path).enumerate() {
        if depth > 0 {
            prefix.push('/');
        }
        prefix.push_str(segment);
        crumbs.push(Crumb {
            name: segment.to_string(),
            path: prefix.clone(),
        });
    }
    crumbs
}

/// A sub-directory with the number of paths below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub path: String,
    pub count: u64,
}

impl From<DirectorySummary> for Folder {
    fn from(d: DirectorySummary) -> Self {
        Folder {
            name: d.name,
            path: d.path,
            count: d.count,
        }
    }
}

impl From<DirectoryEntry> for Folder {
    fn from(d: DirectoryEntry) -> Self {
        Folder {
            name: d.name,
            path: d.path,
            count: d.count as u64,
        }
    }
}

/// Contents of one directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathLevel {
    pub directories: Vec<Folder>,
    pub files: Vec<PhotoPath>,
}

impl PathLevel {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// A directory without sub-directories.
    pub fn is_leaf(&self) -> bool {
        self.directories.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Open the directory at `prefix`; empty for the root.
    Jump(String),
    /// Open a sub-directory of the current level by name.
    Enter(String),
    Up,
    Refresh,
    LevelLoaded(Ticket, Result<PathLevel, String>),
    CatalogLoaded(Ticket, Result<Vec<PhotoPath>, String>),
    SetSortKey(SortKey),
    ToggleDirection,
    ToggleSelect(u64),
    SelectAll,
    UnselectAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    FetchLevel(Ticket, String),
    FetchCatalog(Ticket),
}

impl Task {
    pub async fn perform(self, client: &ApiClient) -> Message {
        match self {
            Task::FetchLevel(ticket, prefix) => {
                let filter = PathFilter::direct_children(prefix.clone());
                let level = tokio::try_join!(
                    client.directory_summary(&prefix),
                    client.list_photo_paths(&filter)
                )
                .map(|(dirs, files)| PathLevel {
                    directories: dirs.into_iter().map(Folder::from).collect(),
                    files,
                })
                .map_err(|e| e.to_string());
                Message::LevelLoaded(ticket, level)
            }
            Task::FetchCatalog(ticket) => Message::CatalogLoaded(
                ticket,
                client
                    .list_photo_paths(&PathFilter::default())
                    .await
                    .map_err(|e| e.to_string()),
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct PhotoPathsView {
    mode: GroupingMode,
    prefix: String,
    tickets: Tickets,
    state: Load<PathLevel>,
    catalog: Option<PathTree<PhotoPath>>,
    sort: SortOrder,
    selection: Selection,
}

impl PhotoPathsView {
    pub fn new(mode: GroupingMode) -> Self {
        PhotoPathsView {
            mode,
            ..Default::default()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn crumbs(&self) -> Vec<Crumb> {
        crumbs_for(&self.prefix)
    }

    pub fn state(&self) -> &Load<PathLevel> {
        &self.state
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Files of the current directory, sorted.
    pub fn files(&self) -> &[PhotoPath] {
        self.state.ready().map(|l| l.files.as_slice()).unwrap_or(&[])
    }

    pub fn directories(&self) -> &[Folder] {
        self.state
            .ready()
            .map(|l| l.directories.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(self.files())
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub fn update(&mut self, message: Message) -> Option<Task> {
        match message {
            Message::Jump(prefix) => self.navigate(prefix),
            Message::Enter(name) => {
                let target = self
                    .directories()
                    .iter()
                    .find(|d| d.name == name)
                    .map(|d| d.path.clone());
                match target {
                    Some(path) => self.navigate(path),
                    None => {
                        tracing::debug!(%name, "No such directory at this level");
                        None
                    }
                }
            }
            Message::Up => {
                let mut crumbs = self.crumbs();
                crumbs.pop();
                let parent = crumbs.pop().map(|c| c.path).unwrap_or_default();
                self.navigate(parent)
            }
            Message::Refresh => {
                self.catalog = None;
                self.load()
            }
            Message::LevelLoaded(ticket, result) => {
                if !self.accept(ticket) {
                    return None;
                }
                match result {
                    Ok(level) => self.show(level),
                    Err(e) => self.state = Load::Failed(e),
                }
                None
            }
            Message::CatalogLoaded(ticket, result) => {
                if !self.accept(ticket) {
                    return None;
                }
                match result {
                    Ok(paths) => {
                        tracing::info!(count = paths.len(), "Grouping photo paths by directory");
                        self.catalog = Some(PathTree::build(paths, |p| p.path.as_str()));
                        self.show_from_catalog();
                    }
                    Err(e) => self.state = Load::Failed(e),
                }
                None
            }
            Message::SetSortKey(key) => {
                self.sort.key = key;
                self.resort();
                None
            }
            Message::ToggleDirection => {
                self.sort.toggle_direction();
                self.resort();
                None
            }
            Message::ToggleSelect(id) => {
                if self.files().iter().any(|p| p.id == id) {
                    self.selection.toggle(id);
                }
                None
            }
            Message::SelectAll => {
                if let Some(level) = self.state.ready() {
                    self.selection.select_all(&level.files);
                }
                None
            }
            Message::UnselectAll => {
                self.selection.unselect_all();
                None
            }
        }
    }

    fn accept(&self, ticket: Ticket) -> bool {
        let current = self.tickets.is_current(ticket);
        if !current {
            tracing::debug!(?ticket, "Discarding superseded photo paths response");
        }
        current
    }

    fn navigate(&mut self, prefix: String) -> Option<Task> {
        self.prefix = prefix;
        self.selection.unselect_all();
        self.load()
    }

    fn load(&mut self) -> Option<Task> {
        let ticket = self.tickets.issue();
        if self.mode == GroupingMode::Client {
            if self.catalog.is_some() {
                self.show_from_catalog();
                return None;
            }
            self.state = Load::Loading;
            return Some(Task::FetchCatalog(ticket));
        }
        self.state = Load::Loading;
        Some(Task::FetchLevel(ticket, self.prefix.clone()))
    }

    fn show_from_catalog(&mut self) {
        let level = match &self.catalog {
            Some(tree) => {
                let segments: Vec<&str> = split_path(&self.prefix).collect();
                let listing = tree.listing(&segments);
                PathLevel {
                    directories: listing.directories.iter().cloned().map(Folder::from).collect(),
                    files: listing.items().cloned().collect(),
                }
            }
            None => return,
        };
        self.show(level);
    }

    fn show(&mut self, mut level: PathLevel) {
        if level.is_empty() {
            self.selection.unselect_all();
            self.state = Load::Empty;
            return;
        }
        sort_items(&mut level.files, self.sort);
        self.selection.retain_displayed(&level.files);
        self.state = Load::Ready(level);
    }

    fn resort(&mut self) {
        let order = self.sort;
        if let Some(level) = self.state.ready_mut() {
            sort_items(&mut level.files, order);
        }
    }
}
