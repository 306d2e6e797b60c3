use api_client::{PhotoPath, Photograph};
use chrono::Datelike;
use hierarchy::{capture_date, split_path, DateTree, PathTree, Tree};
use serde_json::json;

fn path_record(id: u64, path: &str) -> PhotoPath {
    serde_json::from_value(json!({ "id": id, "path": path, "device": "nas" })).unwrap()
}

fn photo(id: u64, time: Option<&str>) -> Photograph {
    serde_json::from_value(json!({ "id": id, "time": time })).unwrap()
}

const PATHS: &[&str] = &[
    "/photos/2023/trip/a.jpg",
    "/photos/2023/trip/b.jpg",
    "/photos/2023/c.jpg",
    "/photos/2024/d.jpg",
    "C:\\Users\\me\\Pictures\\e.jpg",
    "relative/f.jpg",
    "/photos/2023/trip/a.jpg",
    "g.jpg",
    "/",
];

fn chain_of(tree: &Tree<PhotoPath>, id: u64) -> Vec<Vec<String>> {
    fn walk(
        node: &Tree<PhotoPath>,
        trail: &mut Vec<String>,
        id: u64,
        found: &mut Vec<Vec<String>>,
    ) {
        if node.items().iter().any(|p| p.id == id) {
            found.push(trail.clone());
        }
        for (key, child) in node.children() {
            trail.push(key.to_string());
            walk(child, trail, id, found);
            trail.pop();
        }
    }
    let mut found = Vec::new();
    walk(tree, &mut Vec::new(), id, &mut found);
    found
}

#[test]
fn every_path_lands_under_exactly_one_segment_chain() {
    let records: Vec<PhotoPath> = PATHS
        .iter()
        .enumerate()
        .map(|(i, p)| path_record(i as u64, p))
        .collect();
    let tree = PathTree::build(records.clone(), |p| p.path.as_str());

    assert_eq!(tree.root().descendant_count(), records.len());
    assert_eq!(tree.len(), records.len());

    for record in &records {
        let chains = chain_of(tree.root(), record.id);
        assert_eq!(chains.len(), 1, "{}", record.path);
        let expected: Vec<String> = split_path(&record.path).map(str::to_string).collect();
        assert_eq!(chains[0], expected);
    }
}

#[test]
fn listing_counts_add_up_at_every_level() {
    let records: Vec<PhotoPath> = PATHS
        .iter()
        .enumerate()
        .map(|(i, p)| path_record(i as u64, p))
        .collect();
    let tree = PathTree::build(records, |p| p.path.as_str());

    let root = tree.listing::<&str>(&[]);
    let dirs: usize = root.directories.iter().map(|d| d.count).sum();
    let files: usize = root.files.iter().map(|f| f.items.len()).sum();
    assert_eq!(dirs + files, tree.len());
    assert!(root.items().any(|p| p.path == "/"));
}

#[test]
fn unusable_timestamps_are_never_under_a_year() {
    let raws = [None, Some(""), Some("??"), Some("2023-02-30T00:00:00Z"), Some("12/01/2020")];
    let photos: Vec<Photograph> = raws
        .iter()
        .enumerate()
        .map(|(i, t)| photo(i as u64, *t))
        .collect();
    let tree = DateTree::build(photos, |p| p.time.as_deref());

    assert!(tree.years().is_empty());
    assert_eq!(tree.unknown().len(), raws.len());
}

#[test]
fn date_keys_reconstruct_the_calendar_date() {
    let raws = [
        "2001-01-09T00:00:00Z",
        "1999-12-31T23:59:59+02:00",
        "2020-02-29 12:00:00",
        "0987:06:07 08:09:10",
        "2024-10-01",
    ];
    let photos: Vec<Photograph> = raws
        .iter()
        .enumerate()
        .map(|(i, t)| photo(i as u64, Some(*t)))
        .collect();
    let tree = DateTree::build(photos.clone(), |p| p.time.as_deref());

    for photo in &photos {
        let raw = photo.time.as_deref().unwrap();
        let date = capture_date(raw).unwrap();
        let mut found = None;
        for year in tree.years() {
            for month in tree.months(&year.key) {
                for day in tree.days(&year.key, &month.key) {
                    if tree
                        .items(&year.key, &month.key, &day.key)
                        .iter()
                        .any(|p| p.id == photo.id)
                    {
                        found = Some(format!("{}{}{}", year.key, month.key, day.key));
                    }
                }
            }
        }
        let expected = format!("{:04}{:02}{:02}", date.year(), date.month(), date.day());
        assert_eq!(found.as_deref(), Some(expected.as_str()), "{raw}");
    }
    assert!(tree.unknown().is_empty());
}
