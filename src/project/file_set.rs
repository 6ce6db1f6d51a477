use super::source_file::{normalize_path, SourceFile};

/// Ordered collection of project files with unique paths.
///
/// Insertion order is preserved; writing an existing path replaces its
/// content in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a file. Returns `true` when an existing path was replaced.
    pub fn upsert(&mut self, file: SourceFile) -> bool {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => {
                *existing = file;
                true
            }
            None => {
                self.files.push(file);
                false
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        let path = normalize_path(path);
        self.files.iter().find(|f| f.path == path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut SourceFile> {
        let path = normalize_path(path);
        self.files.iter_mut().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SourceFile> {
        self.files.iter_mut()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn into_vec(self) -> Vec<SourceFile> {
        self.files
    }
}

impl FromIterator<SourceFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for file in iter {
            set.upsert(file);
        }
        set
    }
}

impl IntoIterator for FileSet {
    type Item = SourceFile;
    type IntoIter = std::vec::IntoIter<SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_last_write_wins() {
        let mut set = FileSet::new();
        assert!(!set.upsert(SourceFile::new("src/App.tsx", "one")));
        assert!(!set.upsert(SourceFile::new("src/main.tsx", "main")));
        assert!(set.upsert(SourceFile::new("/src/App.tsx", "two")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.paths(), vec!["src/App.tsx", "src/main.tsx"]);
        assert_eq!(set.get("src/App.tsx").unwrap().content, "two");
    }

    #[test]
    fn test_lookup_normalizes() {
        let set: FileSet = vec![SourceFile::new("src/index.css", "")].into_iter().collect();
        assert!(set.contains("./src/index.css"));
        assert!(!set.contains("index.css"));
    }
}
