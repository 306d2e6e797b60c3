//! Plain-text rendering of view state.

use api_client::{Album, PhotoPath, Photograph};
use browser::photo_paths::PhotoPathsView;
use browser::photographs::{Content, PhotographsView};
use browser::{BulkOutcome, BulkReport, Load};
use std::fmt::Write;

pub const NOTHING_HERE: &str = "Nothing here";
pub const LOADING: &str = "Loading...";

/// Text for the current photographs level; `Err` carries the load failure.
pub fn photographs(view: &PhotographsView) -> Result<String, String> {
    let crumbs: Vec<String> = view.path().breadcrumbs().into_iter().map(|(l, _)| l).collect();
    let mut out = crumbs.join(" > ");
    out.push('\n');
    match view.state() {
        Load::Failed(e) => return Err(e.clone()),
        Load::Ready(Content::Levels(levels)) => {
            for level in levels {
                let _ = writeln!(out, "{} ({})", level.key, level.count);
            }
        }
        Load::Ready(Content::Photographs(items)) => {
            for photo in items {
                out.push_str(&photograph_line(photo));
                out.push('\n');
            }
        }
        Load::Idle | Load::Loading => {
            out.push_str(LOADING);
            out.push('\n');
        }
        Load::Empty => {
            out.push_str(NOTHING_HERE);
            out.push('\n');
        }
    }
    Ok(out)
}

pub fn photograph_line(photo: &Photograph) -> String {
    let path = photo.paths.first().map(|p| p.path.as_str()).unwrap_or("-");
    format!(
        "{:>6}  {:<25}  {}",
        photo.id,
        photo.time.as_deref().unwrap_or("-"),
        path
    )
}

pub fn photo_paths(view: &PhotoPathsView) -> Result<String, String> {
    let crumbs: Vec<String> = view.crumbs().into_iter().map(|c| c.name).collect();
    let mut out = crumbs.join(" > ");
    out.push('\n');
    match view.state() {
        Load::Failed(e) => return Err(e.clone()),
        Load::Ready(level) => {
            for dir in &level.directories {
                let _ = writeln!(out, "{}/ ({})", dir.name, dir.count);
            }
            for file in &level.files {
                out.push_str(&photo_path_line(file));
                out.push('\n');
            }
        }
        Load::Idle | Load::Loading => {
            out.push_str(LOADING);
            out.push('\n');
        }
        Load::Empty => {
            out.push_str(NOTHING_HERE);
            out.push('\n');
        }
    }
    Ok(out)
}

fn photo_path_line(path: &PhotoPath) -> String {
    format!("{:>6}  {}", path.id, path.path)
}

pub fn albums<'a>(albums: impl IntoIterator<Item = &'a Album>) -> String {
    let mut out = String::new();
    for album in albums {
        let _ = writeln!(out, "{:>6}  {} ({} photos)", album.id, album.name, album.photos_count);
    }
    if out.is_empty() {
        out.push_str(NOTHING_HERE);
        out.push('\n');
    }
    out
}

pub fn bulk_report(report: &BulkReport) -> String {
    let mut out = String::new();
    for (id, outcome) in &report.outcomes {
        let _ = match outcome {
            BulkOutcome::Done => writeln!(out, "{} deleted", id),
            BulkOutcome::Failed(e) => writeln!(out, "{} failed: {}", id, e),
            BulkOutcome::Skipped => writeln!(out, "{} skipped", id),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser::photographs::{DatePath, Message, Task};
    use browser::{GroupingMode, Ticket};
    use serde_json::json;

    fn catalog_ticket(task: Option<Task>) -> Ticket {
        match task {
            Some(Task::FetchCatalog(t)) => t,
            other => panic!("expected a catalog fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_level_says_nothing_here() {
        let mut view = PhotographsView::new(GroupingMode::Client);
        let t = catalog_ticket(view.update(Message::Jump(DatePath::Year("2023".into()))));
        view.update(Message::CatalogLoaded(t, Ok(vec![])));
        assert!(view.state().is_empty());
        let text = photographs(&view).unwrap();
        assert_eq!(text, "All > 2023\nNothing here\n");
    }

    #[test]
    fn test_pending_level_says_loading() {
        let mut view = PhotographsView::new(GroupingMode::Client);
        view.update(Message::Jump(DatePath::Year("2023".into())));
        assert_eq!(photographs(&view).unwrap(), "All > 2023\nLoading...\n");

        let paths = PhotoPathsView::new(GroupingMode::Server);
        assert!(photo_paths(&paths).unwrap().ends_with("Loading...\n"));
    }

    #[test]
    fn test_albums_listing() {
        let trips: Album =
            serde_json::from_value(json!({ "id": 1, "name": "Trips", "photos_count": 3 })).unwrap();
        assert_eq!(albums([&trips]), "     1  Trips (3 photos)\n");
        assert_eq!(albums(std::iter::empty::<&Album>()), "Nothing here\n");
    }

    #[test]
    fn test_bulk_report_lines() {
        let report = BulkReport {
            outcomes: vec![
                (1, BulkOutcome::Done),
                (2, BulkOutcome::Failed("Forbidden".into())),
                (3, BulkOutcome::Skipped),
            ],
        };
        assert_eq!(bulk_report(&report), "1 deleted\n2 failed: Forbidden\n3 skipped\n");
    }
}
