use crate::Tree;

/// Split a file-system path on `/` and `\`, dropping empty segments.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(|c| c == '/' || c == '\\').filter(|s| !s.is_empty())
}

/// Items grouped by the directory segments of their path.
#[derive(Debug, Clone)]
pub struct PathTree<T> {
    root: Tree<T>,
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        PathTree { root: Tree::default() }
    }
}

/// A sub-directory shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub count: usize,
}

/// A file shown in a listing with every item stored under that exact path.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry<'a, T> {
    pub name: &'a str,
    pub path: &'a str,
    pub items: &'a [T],
}

/// Contents of one directory level.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<'a, T> {
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<FileEntry<'a, T>>,
}

impl<'a, T> Default for Listing<'a, T> {
    fn default() -> Self {
        Listing {
            directories: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl<'a, T> Listing<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// A level without sub-directories is where items are shown.
    pub fn is_leaf(&self) -> bool {
        self.directories.is_empty()
    }

    /// Items of all files at this level, in name order.
    pub fn items(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.files.iter().flat_map(|f| f.items.iter())
    }
}

impl<T> PathTree<T> {
    pub fn build<I, F>(items: I, path_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> &str,
    {
        let mut root = Tree::default();
        for item in items {
            let raw = path_of(&item);
            let root_prefix = if raw.starts_with('/') || raw.starts_with('\\') {
                "/"
            } else {
                ""
            };
            let segments: Vec<String> = split_path(raw).map(str::to_string).collect();
            root.insert(&segments, item, root_prefix, "/");
        }
        PathTree { root }
    }

    pub fn root(&self) -> &Tree<T> {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.descendant_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List the level reached by `prefix`. An unknown segment gives an empty listing.
    ///
    /// A child holding items and children at once shows up both as a
    /// directory and as a file, so none of its items disappear from view.
    /// Items stored at the listed node itself (e.g. the path `/` at the root)
    /// come first, as a file named by the node's path.
    pub fn listing<S: AsRef<str>>(&self, prefix: &[S]) -> Listing<'_, T> {
        let Some(node) = self.root.descend(prefix) else {
            return Listing::default();
        };
        let mut listing = Listing::default();
        if !node.items().is_empty() {
            listing.files.push(FileEntry {
                name: node.path(),
                path: node.path(),
                items: node.items(),
            });
        }
        for (name, child) in node.children() {
            if child.is_directory() {
                listing.directories.push(DirectoryEntry {
                    name: name.to_string(),
                    path: child.path().to_string(),
                    count: child.descendant_count(),
                });
            }
            if !child.items().is_empty() {
                listing.files.push(FileEntry {
                    name,
                    path: child.path(),
                    items: child.items(),
                });
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path_mixed_separators() {
        let parts: Vec<&str> = split_path("C:\\photos//2023/a.jpg").collect();
        assert_eq!(parts, vec!["C:", "photos", "2023", "a.jpg"]);
        assert_eq!(split_path("///").count(), 0);
    }

    #[test]
    fn test_listing_directories_and_files() {
        let paths = vec![
            "/photos/2023/trip/a.jpg",
            "/photos/2023/trip/b.jpg",
            "/photos/2023/c.jpg",
            "/photos/2024/d.jpg",
        ];
        let tree = PathTree::build(paths, |p| *p);

        let top = tree.listing(&["photos"]);
        assert_eq!(
            top.directories,
            vec![
                DirectoryEntry { name: "2023".into(), path: "/photos/2023".into(), count: 3 },
                DirectoryEntry { name: "2024".into(), path: "/photos/2024".into(), count: 1 },
            ]
        );
        assert!(top.files.is_empty());
        assert!(!top.is_leaf());

        let y2023 = tree.listing(&["photos", "2023"]);
        assert_eq!(y2023.directories.len(), 1);
        assert_eq!(y2023.files.len(), 1);
        assert_eq!(y2023.files[0].path, "/photos/2023/c.jpg");

        let trip = tree.listing(&["photos", "2023", "trip"]);
        assert!(trip.is_leaf());
        let names: Vec<&str> = trip.files.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_missing_segment_is_empty_listing() {
        let tree = PathTree::build(vec!["/a/b.jpg"], |p| *p);
        let listing = tree.listing(&["nope", "deeper"]);
        assert!(listing.is_empty());
    }

    #[test]
    fn test_same_path_on_two_devices_is_one_file() {
        let items = vec![("/a/b.jpg", "nas"), ("/a/b.jpg", "laptop")];
        let tree = PathTree::build(items, |item| item.0);
        let listing = tree.listing(&["a"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].items.len(), 2);
    }

    #[test]
    fn test_segmentless_paths_listed_at_root() {
        let tree = PathTree::build(vec!["/", "\\", "", "/a/b.jpg"], |p| *p);
        let root = tree.listing::<&str>(&[]);
        assert_eq!(root.directories.len(), 1);
        assert_eq!(root.files.len(), 1);
        assert_eq!(root.files[0].items, &["/", "\\", ""]);
        assert_eq!(root.items().count(), 3);
    }

    #[test]
    fn test_windows_paths_keep_drive_segment() {
        let tree = PathTree::build(vec!["D:\\pics\\x.jpg"], |p| *p);
        let listing = tree.listing(&["D:"]);
        assert_eq!(listing.directories[0].path, "D:/pics");
    }
}
