use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;

/// Per-image titles keyed by image file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleMap {
    titles: HashMap<String, String>,
}

impl TitleMap {
    /// Load titles from a `<image-filename>:<title>` file
    ///
    /// A missing file gives an empty map.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!("No title file at {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let titles = Self::parse(&content);
        info!("Loaded {} titles from {:?}", titles.len(), path);
        Ok(titles)
    }

    /// Parse title file content, skipping malformed lines
    ///
    /// A line counts only if it holds exactly one `:` with text on both sides.
    pub fn parse(content: &str) -> Self {
        let mut titles = HashMap::new();

        for (number, line) in content.lines().enumerate() {
            let mut parts = line.trim_end_matches('\r').split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(title), None)
                    if !name.trim().is_empty() && !title.trim().is_empty() =>
                {
                    titles.insert(name.trim().to_string(), title.trim().to_string());
                }
                _ => {
                    if !line.trim().is_empty() {
                        debug!("Skipping title line {}: {:?}", number + 1, line);
                    }
                }
            }
        }

        Self { titles }
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.titles.get(file_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_valid_lines() {
        let titles = TitleMap::parse("a.jpg:Summer Trip\nb.png: Winter \r\n");
        assert_eq!(titles.len(), 2);
        assert_eq!(titles.get("a.jpg"), Some("Summer Trip"));
        assert_eq!(titles.get("b.png"), Some("Winter"));
        assert_eq!(titles.get("c.jpg"), None);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let content = "\
no colon here
a.jpg:
:Orphan title
b.jpg:Time: 10:30
c.jpg:Kept
";
        let titles = TitleMap::parse(content);
        assert_eq!(titles.len(), 1);
        assert_eq!(titles.get("c.jpg"), Some("Kept"));
        assert_eq!(titles.get("a.jpg"), None);
        assert_eq!(titles.get("b.jpg"), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let titles = TitleMap::load(dir.path().join("titles.txt")).unwrap();
        assert!(titles.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.txt");
        std::fs::write(&path, "a.jpg:Summer Trip\n").unwrap();

        let titles = TitleMap::load(&path).unwrap();
        assert_eq!(titles.get("a.jpg"), Some("Summer Trip"));
    }
}
