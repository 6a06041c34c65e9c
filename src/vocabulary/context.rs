//! The object a vocabulary is resolved against.

use serde::Serialize;

/// Location in the content tree a vocabulary request was made on.
///
/// Permission checks and path projection are both relative to this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    physical_path: Vec<String>,
}

impl RequestContext {
    /// Builds a context from a slash separated path such as `/plone/news`.
    pub fn from_path(path: &str) -> Self {
        let physical_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self { physical_path }
    }

    /// Returns the context located at `relative` beneath this one, or `None`
    /// when `relative` contains a `.` or `..` segment.
    pub fn child(&self, relative: &str) -> Option<Self> {
        let mut physical_path = self.physical_path.clone();
        for segment in relative.split('/').filter(|segment| !segment.is_empty()) {
            if segment == "." || segment == ".." {
                return None;
            }
            physical_path.push(segment.to_owned());
        }
        Some(Self { physical_path })
    }

    pub fn physical_path(&self) -> &[String] {
        &self.physical_path
    }

    /// Physical path joined with `/`, with a leading slash. The root is `""`.
    pub fn base_path(&self) -> String {
        self.physical_path
            .iter()
            .map(|segment| format!("/{}", segment))
            .collect()
    }

    /// True when `path` is this context or lies beneath it.
    pub fn contains_path(&self, path: &str) -> bool {
        let other = Self::from_path(path);
        other.physical_path.starts_with(&self.physical_path)
    }
}
