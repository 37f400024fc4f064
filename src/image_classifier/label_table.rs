use crate::image_classifier::error::ClassifyError;
use std::path::Path;

/// Label `i` names model output `i`. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// One label per line. Blank lines are kept as empty labels.
    pub fn parse(text: &str) -> Self {
        Self {
            labels: text.lines().map(|line| line.to_string()).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ClassifyError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::ModelLoad(format!(
                "could not read labels from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|s| s.as_str())
    }

    pub fn empty_labels(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_empty())
            .map(|(i, _)| i)
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
