//! Generated component artifacts.
//!
//! An artifact is the three-part output of a generation attempt: the
//! Angular template, optional extra styles and the component class.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File names used when exporting an artifact to disk
pub const HTML_FILE: &str = "component.html";
pub const CSS_FILE: &str = "component.css";
pub const TYPESCRIPT_FILE: &str = "component.ts";

/// A generated UI component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentArtifact {
    /// Angular HTML template
    pub html: String,

    /// Extra CSS (may be empty when Tailwind covers everything)
    pub css: String,

    /// Angular TypeScript component class
    pub typescript: String,
}

impl ComponentArtifact {
    /// Create a new artifact
    pub fn new(
        html: impl Into<String>,
        css: impl Into<String>,
        typescript: impl Into<String>,
    ) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            typescript: typescript.into(),
        }
    }

    /// Write the three parts into `dir`, creating it if needed.
    ///
    /// Returns the paths written, in html, css, typescript order.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let parts = [
            (HTML_FILE, &self.html),
            (CSS_FILE, &self.css),
            (TYPESCRIPT_FILE, &self.typescript),
        ];

        let mut written = Vec::with_capacity(parts.len());
        for (name, content) in parts {
            let path = dir.join(name);
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_wire_shape() {
        let artifact = ComponentArtifact::new("<div></div>", "", "class C {}");
        let json = serde_json::to_value(&artifact).unwrap();

        assert_eq!(json["html"], "<div></div>");
        assert_eq!(json["css"], "");
        assert_eq!(json["typescript"], "class C {}");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_write_to_creates_three_files() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested").join("login");
        let artifact = ComponentArtifact::new("<p>hi</p>", "p { color: red; }", "export class A {}");

        let written = artifact.write_to(&out).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(
            std::fs::read_to_string(out.join(HTML_FILE)).unwrap(),
            "<p>hi</p>"
        );
        assert_eq!(
            std::fs::read_to_string(out.join(CSS_FILE)).unwrap(),
            "p { color: red; }"
        );
        assert_eq!(
            std::fs::read_to_string(out.join(TYPESCRIPT_FILE)).unwrap(),
            "export class A {}"
        );
    }
}
