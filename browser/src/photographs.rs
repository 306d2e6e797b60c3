//! Photographs browsed by capture year, month and day.

use crate::bulk::{self, BulkPolicy, BulkReport};
use crate::{GroupingMode, Load, Ticket, Tickets};
use api_client::{ApiClient, ApiClientError, DateBucket, Photograph, PhotographFilter, UNKNOWN};
use hierarchy::{sort_items, Bucket, DateTree, Selection, SortKey, SortOrder};

/// Position in the date hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatePath {
    #[default]
    Root,
    Year(String),
    Month(String, String),
    Day(String, String, String),
    Unknown,
}

impl DatePath {
    /// Child position for `key`, or `None` below the leaf level.
    pub fn enter(&self, key: &str) -> Option<DatePath> {
        let key = key.to_string();
        match self {
            DatePath::Root if key == UNKNOWN => Some(DatePath::Unknown),
            DatePath::Root => Some(DatePath::Year(key)),
            DatePath::Year(y) => Some(DatePath::Month(y.clone(), key)),
            DatePath::Month(y, m) => Some(DatePath::Day(y.clone(), m.clone(), key)),
            DatePath::Day(..) | DatePath::Unknown => None,
        }
    }

    pub fn parent(&self) -> DatePath {
        match self {
            DatePath::Root | DatePath::Year(_) | DatePath::Unknown => DatePath::Root,
            DatePath::Month(y, _) => DatePath::Year(y.clone()),
            DatePath::Day(y, m, _) => DatePath::Month(y.clone(), m.clone()),
        }
    }

    /// Leaf positions show photographs instead of sub-levels.
    pub fn is_leaf(&self) -> bool {
        matches!(self, DatePath::Day(..) | DatePath::Unknown)
    }

    pub fn filter(&self) -> PhotographFilter {
        match self {
            DatePath::Root => PhotographFilter::All,
            DatePath::Year(y) => PhotographFilter::Year(y.clone()),
            DatePath::Month(y, m) => PhotographFilter::Month(y.clone(), m.clone()),
            DatePath::Day(y, m, d) => PhotographFilter::Day(y.clone(), m.clone(), d.clone()),
            DatePath::Unknown => PhotographFilter::Unknown,
        }
    }

    /// Breadcrumbs from the root down to this position.
    pub fn breadcrumbs(&self) -> Vec<(String, DatePath)> {
        let mut crumbs = vec![("All".to_string(), DatePath::Root)];
        match self {
            DatePath::Root => {}
            DatePath::Unknown => crumbs.push((UNKNOWN.to_string(), DatePath::Unknown)),
            DatePath::Year(y) => crumbs.push((y.clone(), self.clone())),
            DatePath::Month(y, m) => {
                crumbs.push((y.clone(), DatePath::Year(y.clone())));
                crumbs.push((m.clone(), self.clone()));
            }
            DatePath::Day(y, m, d) => {
                crumbs.push((y.clone(), DatePath::Year(y.clone())));
                crumbs.push((m.clone(), DatePath::Month(y.clone(), m.clone())));
                crumbs.push((d.clone(), self.clone()));
            }
        }
        crumbs
    }
}

/// A child level with the number of photographs below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub key: String,
    pub count: u64,
}

impl From<DateBucket> for Level {
    fn from(b: DateBucket) -> Self {
        Level { key: b.key, count: b.count }
    }
}

impl From<Bucket> for Level {
    fn from(b: Bucket) -> Self {
        Level {
            key: b.key,
            count: b.count as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Levels(Vec<Level>),
    Photographs(Vec<Photograph>),
}

#[derive(Debug, Clone)]
pub enum Message {
    Jump(DatePath),
    Enter(String),
    Up,
    Refresh,
    LevelsLoaded(Ticket, Result<Vec<Level>, String>),
    PhotographsLoaded(Ticket, Result<Vec<Photograph>, String>),
    CatalogLoaded(Ticket, Result<Vec<Photograph>, String>),
    SetSortKey(SortKey),
    ToggleDirection,
    ToggleSelect(u64),
    SelectAll,
    UnselectAll,
    DeleteSelected(BulkPolicy),
    Deleted(BulkReport),
    AddSelectedToAlbum(u64),
    RemoveSelectedFromAlbum(u64),
    AlbumChanged(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    FetchYears(Ticket),
    FetchMonths(Ticket, String),
    FetchDays(Ticket, String, String),
    FetchPhotographs(Ticket, PhotographFilter),
    FetchCatalog(Ticket),
    Delete(Vec<u64>, BulkPolicy),
    AddToAlbum(u64, Vec<u64>),
    RemoveFromAlbum(u64, Vec<u64>),
}

fn levels(result: Result<Vec<DateBucket>, ApiClientError>) -> Result<Vec<Level>, String> {
    result
        .map(|buckets| buckets.into_iter().map(Level::from).collect())
        .map_err(|e| e.to_string())
}

impl Task {
    pub async fn perform(self, client: &ApiClient) -> Message {
        match self {
            Task::FetchYears(t) => {
                Message::LevelsLoaded(t, levels(client.photograph_years().await))
            }
            Task::FetchMonths(t, y) => {
                Message::LevelsLoaded(t, levels(client.photograph_months(&y).await))
            }
            Task::FetchDays(t, y, m) => {
                Message::LevelsLoaded(t, levels(client.photograph_days(&y, &m).await))
            }
            Task::FetchPhotographs(t, filter) => Message::PhotographsLoaded(
                t,
                client
                    .list_photographs(&filter)
                    .await
                    .map_err(|e| e.to_string()),
            ),
            Task::FetchCatalog(t) => Message::CatalogLoaded(
                t,
                client
                    .list_photographs(&PhotographFilter::All)
                    .await
                    .map_err(|e| e.to_string()),
            ),
            Task::Delete(ids, policy) => {
                Message::Deleted(bulk::delete_photographs(client, &ids, policy).await)
            }
            Task::AddToAlbum(album, ids) => Message::AlbumChanged(
                bulk::add_to_album(client, album, &ids)
                    .await
                    .map_err(|e| e.to_string()),
            ),
            Task::RemoveFromAlbum(album, ids) => Message::AlbumChanged(
                bulk::remove_from_album(client, album, &ids)
                    .await
                    .map_err(|e| e.to_string()),
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct PhotographsView {
    mode: GroupingMode,
    path: DatePath,
    tickets: Tickets,
    state: Load<Content>,
    catalog: Option<DateTree<Photograph>>,
    sort: SortOrder,
    selection: Selection,
    report: Option<BulkReport>,
}

impl PhotographsView {
    pub fn new(mode: GroupingMode) -> Self {
        PhotographsView {
            mode,
            ..Default::default()
        }
    }

    pub fn path(&self) -> &DatePath {
        &self.path
    }

    pub fn state(&self) -> &Load<Content> {
        &self.state
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Outcome of the last bulk deletion, if any.
    pub fn report(&self) -> Option<&BulkReport> {
        self.report.as_ref()
    }

    /// Photographs currently displayed, sorted; empty above the leaf level.
    pub fn photographs(&self) -> &[Photograph] {
        match self.state.ready() {
            Some(Content::Photographs(items)) => items,
            _ => &[],
        }
    }

    pub fn levels(&self) -> &[Level] {
        match self.state.ready() {
            Some(Content::Levels(levels)) => levels,
            _ => &[],
        }
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(self.photographs())
    }

    /// Selected photographs among those displayed.
    pub fn selected_photographs(&self) -> Vec<&Photograph> {
        self.photographs()
            .iter()
            .filter(|p| self.selection.contains(p.id))
            .collect()
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub fn update(&mut self, message: Message) -> Option<Task> {
        match message {
            Message::Jump(path) => self.navigate(path),
            Message::Enter(key) => {
                let next = self.path.enter(&key)?;
                self.navigate(next)
            }
            Message::Up => self.navigate(self.path.parent()),
            Message::Refresh => {
                self.catalog = None;
                self.load()
            }
            Message::LevelsLoaded(ticket, result) => {
                if !self.accept(ticket) {
                    return None;
                }
                self.state = match result {
                    Ok(levels) if levels.is_empty() => Load::Empty,
                    Ok(levels) => Load::Ready(Content::Levels(levels)),
                    Err(e) => Load::Failed(e),
                };
                None
            }
            Message::PhotographsLoaded(ticket, result) => {
                if !self.accept(ticket) {
                    return None;
                }
                match result {
                    Ok(items) => self.show_photographs(items),
                    Err(e) => self.state = Load::Failed(e),
                }
                None
            }
            Message::CatalogLoaded(ticket, result) => {
                if !self.accept(ticket) {
                    return None;
                }
                match result {
                    Ok(items) => {
                        tracing::info!(count = items.len(), "Grouping photographs by date");
                        self.catalog = Some(DateTree::build(items, |p| p.time.as_deref()));
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
                if self.photographs().iter().any(|p| p.id == id) {
                    self.selection.toggle(id);
                }
                None
            }
            Message::SelectAll => {
                if let Some(Content::Photographs(items)) = self.state.ready() {
                    self.selection.select_all(items);
                }
                None
            }
            Message::UnselectAll => {
                self.selection.unselect_all();
                None
            }
            Message::DeleteSelected(policy) => {
                if self.selection.is_empty() {
                    return None;
                }
                Some(Task::Delete(self.selection.ids(), policy))
            }
            Message::Deleted(report) => {
                for id in report.succeeded() {
                    self.selection.remove(id);
                }
                self.report = Some(report);
                self.catalog = None;
                self.load()
            }
            Message::AddSelectedToAlbum(album) => {
                if self.selection.is_empty() {
                    return None;
                }
                Some(Task::AddToAlbum(album, self.selection.ids()))
            }
            Message::RemoveSelectedFromAlbum(album) => {
                if self.selection.is_empty() {
                    return None;
                }
                Some(Task::RemoveFromAlbum(album, self.selection.ids()))
            }
            Message::AlbumChanged(Ok(())) => {
                self.catalog = None;
                self.load()
            }
            Message::AlbumChanged(Err(e)) => {
                self.state = Load::Failed(e);
                None
            }
        }
    }

    fn accept(&self, ticket: Ticket) -> bool {
        let current = self.tickets.is_current(ticket);
        if !current {
            tracing::debug!(?ticket, "Discarding superseded photographs response");
        }
        current
    }

    fn navigate(&mut self, path: DatePath) -> Option<Task> {
        self.path = path;
        self.selection.unselect_all();
        self.load()
    }

    fn load(&mut self) -> Option<Task> {
        if self.mode == GroupingMode::Client {
            if self.catalog.is_some() {
                // Supersede anything still in flight for the previous position
                self.tickets.issue();
                self.show_from_catalog();
                return None;
            }
            self.state = Load::Loading;
            return Some(Task::FetchCatalog(self.tickets.issue()));
        }

        self.state = Load::Loading;
        let ticket = self.tickets.issue();
        Some(match &self.path {
            DatePath::Root => Task::FetchYears(ticket),
            DatePath::Year(y) => Task::FetchMonths(ticket, y.clone()),
            DatePath::Month(y, m) => Task::FetchDays(ticket, y.clone(), m.clone()),
            leaf => Task::FetchPhotographs(ticket, leaf.filter()),
        })
    }

    fn show_from_catalog(&mut self) {
        let Some(tree) = &self.catalog else {
            return;
        };
        let to_levels =
            |buckets: Vec<Bucket>| buckets.into_iter().map(Level::from).collect::<Vec<_>>();
        let content = match &self.path {
            DatePath::Root => {
                let mut levels = to_levels(tree.years());
                if !tree.unknown().is_empty() {
                    levels.push(Level {
                        key: UNKNOWN.to_string(),
                        count: tree.unknown().len() as u64,
                    });
                }
                Content::Levels(levels)
            }
            DatePath::Year(y) => Content::Levels(to_levels(tree.months(y))),
            DatePath::Month(y, m) => Content::Levels(to_levels(tree.days(y, m))),
            DatePath::Day(y, m, d) => Content::Photographs(tree.items(y, m, d).to_vec()),
            DatePath::Unknown => Content::Photographs(tree.unknown().to_vec()),
        };
        match content {
            Content::Photographs(items) => self.show_photographs(items),
            Content::Levels(levels) if levels.is_empty() => self.state = Load::Empty,
            levels => self.state = Load::Ready(levels),
        }
    }

    fn show_photographs(&mut self, mut items: Vec<Photograph>) {
        if items.is_empty() {
            self.selection.unselect_all();
            self.state = Load::Empty;
            return;
        }
        sort_items(&mut items, self.sort);
        self.selection.retain_displayed(&items);
        self.state = Load::Ready(Content::Photographs(items));
    }

    fn resort(&mut self) {
        let order = self.sort;
        if let Some(Content::Photographs(items)) = self.state.ready_mut() {
            sort_items(items, order);
        }
    }
}
