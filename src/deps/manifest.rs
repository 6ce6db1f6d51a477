use super::packages::Section;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest root must be a JSON object")]
    NotAnObject,

    #[error("Manifest field '{0}' must be an object of name to version")]
    InvalidSection(&'static str),
}

/// A `package.json` document edited in place.
///
/// Field order and unrelated fields survive a parse/serialize cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyManifest {
    document: Map<String, Value>,
}

impl DependencyManifest {
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(document) = value else {
            return Err(ManifestError::NotAnObject);
        };

        for section in [Section::Dependencies, Section::DevDependencies] {
            match document.get(section.key()) {
                None | Some(Value::Object(_)) => {}
                Some(_) => return Err(ManifestError::InvalidSection(section.key())),
            }
        }
        Ok(Self { document })
    }

    /// Minimal Vite + React manifest
    pub fn synthesize() -> Self {
        let value = serde_json::json!({
            "name": "vite-react-app",
            "private": true,
            "version": "0.0.0",
            "type": "module",
            "scripts": {
                "dev": "vite",
                "build": "vite build",
                "preview": "vite preview"
            },
            "dependencies": {
                "react": "^18.3.1",
                "react-dom": "^18.3.1"
            },
            "devDependencies": {
                "@types/react": "^18.3.12",
                "@types/react-dom": "^18.3.1",
                "@vitejs/plugin-react": "^4.3.3",
                "typescript": "^5.6.3",
                "vite": "^5.4.10"
            }
        });
        match value {
            Value::Object(document) => Self { document },
            _ => Self { document: Map::new() },
        }
    }

    fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        self.document.get(section.key()).and_then(Value::as_object)
    }

    /// Version ranges of one section, in manifest order
    pub fn entries(&self, section: Section) -> Vec<(String, String)> {
        self.section(section)
            .map(|map| {
                map.iter()
                    .map(|(name, version)| (name.clone(), version.as_str().unwrap_or_default().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn version_of(&self, name: &str) -> Option<&str> {
        [Section::Dependencies, Section::DevDependencies]
            .into_iter()
            .find_map(|s| self.section(s).and_then(|m| m.get(name)))
            .and_then(Value::as_str)
    }

    /// Declared in either section
    pub fn declares(&self, name: &str) -> bool {
        [Section::Dependencies, Section::DevDependencies]
            .into_iter()
            .any(|s| self.section(s).map(|m| m.contains_key(name)).unwrap_or(false))
    }

    /// Adds an entry unless the package is already declared anywhere.
    /// Returns whether the manifest changed.
    pub fn add(&mut self, section: Section, name: &str, version: &str) -> bool {
        if self.declares(name) {
            return false;
        }
        let entry = self
            .document
            .entry(section.key())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(map) => {
                map.insert(name.to_string(), Value::String(version.to_string()));
                true
            }
            _ => false,
        }
    }

    pub fn to_json_string(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| "{}".to_string());
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_fields() {
        let content = r#"{
  "name": "shop",
  "scripts": { "dev": "vite" },
  "dependencies": { "react": "18.2.0" },
  "browserslist": ["defaults"]
}"#;
        let mut manifest = DependencyManifest::parse(content).unwrap();
        assert!(manifest.add(Section::Dependencies, "clsx", "^2.1.1"));

        let text = manifest.to_json_string();
        let name = text.find("\"name\"").unwrap();
        let scripts = text.find("\"scripts\"").unwrap();
        let browsers = text.find("\"browserslist\"").unwrap();
        assert!(name < scripts && scripts < browsers);
        assert_eq!(manifest.version_of("react"), Some("18.2.0"));
        assert_eq!(manifest.version_of("clsx"), Some("^2.1.1"));
    }

    #[test]
    fn test_add_never_overwrites() {
        let mut manifest = DependencyManifest::parse(r#"{"devDependencies": {"react": "17.0.2"}}"#).unwrap();
        assert!(!manifest.add(Section::Dependencies, "react", "^18.3.1"));
        assert_eq!(manifest.version_of("react"), Some("17.0.2"));
        assert!(manifest.entries(Section::Dependencies).is_empty());
    }

    #[test]
    fn test_invalid_manifests() {
        assert!(matches!(DependencyManifest::parse("{ \"name\": "), Err(ManifestError::Parse(_))));
        assert!(matches!(DependencyManifest::parse("[]"), Err(ManifestError::NotAnObject)));
        assert!(matches!(
            DependencyManifest::parse(r#"{"dependencies": ["react"]}"#),
            Err(ManifestError::InvalidSection("dependencies"))
        ));
    }

    #[test]
    fn test_synthesized_manifest() {
        let manifest = DependencyManifest::synthesize();
        assert!(manifest.declares("react"));
        assert!(manifest.declares("vite"));
        let reparsed = DependencyManifest::parse(&manifest.to_json_string()).unwrap();
        assert_eq!(reparsed, manifest);
    }
}
