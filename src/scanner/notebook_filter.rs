use crate::config::DiscoveryConfig;
use regex::Regex;
use std::path::Path;

/// Decides which directory entries count as notebooks.
///
/// Matching mirrors a shell glob of `*.<extension>`: the extension is compared
/// exactly and dot-files are never matched.
pub struct NotebookFilter {
    extension: String,
    exclude_patterns: Vec<Regex>,
}

impl NotebookFilter {
    pub fn new(config: &DiscoveryConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!("Ignoring invalid exclude pattern '{}': {}", pattern, err);
                    None
                }
            })
            .collect();

        Self {
            extension: config.extension.trim_start_matches('.').to_string(),
            exclude_patterns,
        }
    }

    pub fn is_notebook(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };

        if filename.starts_with('.') {
            return false;
        }

        if path.extension().and_then(|s| s.to_str()) != Some(self.extension.as_str()) {
            return false;
        }

        !self.matches_any_pattern(filename)
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for NotebookFilter {
    fn default() -> Self {
        Self::new(&DiscoveryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> DiscoveryConfig {
        DiscoveryConfig {
            exclude_patterns: vec![r"^draft_".to_string(), r"-Copy\d*\.ipynb$".to_string()],
            ..DiscoveryConfig::default()
        }
    }

    #[test]
    fn test_notebook_detection() {
        let filter = NotebookFilter::default();

        assert!(filter.is_notebook(Path::new("chapters/intro.ipynb")));
        assert!(filter.is_notebook(Path::new("summary.ipynb")));

        assert!(!filter.is_notebook(Path::new("chapters/intro.html")));
        assert!(!filter.is_notebook(Path::new("chapters/intro.py")));
        assert!(!filter.is_notebook(Path::new("chapters/ipynb")));
        assert!(!filter.is_notebook(Path::new("chapters/intro.ipynb.bak")));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let filter = NotebookFilter::default();
        assert!(!filter.is_notebook(Path::new("INTRO.IPYNB")));
        assert!(!filter.is_notebook(Path::new("intro.Ipynb")));
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let filter = NotebookFilter::default();
        assert!(!filter.is_notebook(Path::new(".hidden.ipynb")));
        assert!(!filter.is_notebook(Path::new("chapters/.ipynb")));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = NotebookFilter::new(&create_test_config());

        assert!(!filter.is_notebook(Path::new("draft_chapter.ipynb")));
        assert!(!filter.is_notebook(Path::new("intro-Copy1.ipynb")));
        assert!(filter.is_notebook(Path::new("intro.ipynb")));
        assert!(filter.matches_any_pattern("draft_x"));
        assert!(!filter.matches_any_pattern("final_x"));
    }

    #[test]
    fn test_leading_dot_in_configured_extension() {
        let config = DiscoveryConfig {
            extension: ".ipynb".to_string(),
            ..DiscoveryConfig::default()
        };
        let filter = NotebookFilter::new(&config);
        assert_eq!(filter.extension(), "ipynb");
        assert!(filter.is_notebook(Path::new("intro.ipynb")));
    }

    #[test]
    fn test_invalid_exclude_pattern_is_ignored() {
        let config = DiscoveryConfig {
            exclude_patterns: vec![r"(unclosed".to_string(), r"^draft_".to_string()],
            ..DiscoveryConfig::default()
        };
        let filter = NotebookFilter::new(&config);

        assert_eq!(filter.exclude_patterns.len(), 1);
        assert!(!filter.is_notebook(Path::new("draft_intro.ipynb")));
        assert!(filter.is_notebook(Path::new("(unclosed.ipynb")));
    }
}
