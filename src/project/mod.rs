//! Virtual project model shared by every pipeline stage

mod file_set;
mod source_file;

pub use file_set::FileSet;
pub use source_file::{
    extension_of, language_for_path, normalize_path, strip_extension, SourceFile,
    MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS,
};

/// Path of the dependency manifest within a project
pub const MANIFEST_PATH: &str = "package.json";

/// Conventional source root stripped when checking path existence
pub const SOURCE_ROOT: &str = "src/";

/// Returns the directory portion of a virtual path (empty for root files)
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolves a relative specifier (`./x`, `../y/z`) against a directory.
///
/// `..` past the project root is dropped rather than escaping it.
pub fn resolve_relative(dir: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Builds the relative specifier that reaches `target` from files in `from_dir`
pub fn relative_specifier(from_dir: &str, target: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from.len() - common;
    let rest = to[common..].join("/");
    if ups == 0 {
        format!("./{}", rest)
    } else {
        format!("{}{}", "../".repeat(ups), rest)
    }
}

/// Converts `about-us`, `user_profile` or `[slug]` into `AboutUs`, `UserProfile`, `Slug`
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("src/components/Hero.tsx"), "src/components");
        assert_eq!(parent_dir("index.html"), "");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_relative("src", "./widgets/Badge"), "src/widgets/Badge");
        assert_eq!(
            resolve_relative("src/components/ui", "../../lib/utils"),
            "src/lib/utils"
        );
        assert_eq!(resolve_relative("", "./App"), "App");
        assert_eq!(resolve_relative("src", "../../../x"), "x");
    }

    #[test]
    fn test_relative_specifier() {
        assert_eq!(relative_specifier("src", "src/components/Header"), "./components/Header");
        assert_eq!(relative_specifier("src/pages", "src/components/Header"), "../components/Header");
        assert_eq!(relative_specifier("", "src/main"), "./src/main");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("about-us"), "AboutUs");
        assert_eq!(pascal_case("[slug]"), "Slug");
        assert_eq!(pascal_case("user_profile"), "UserProfile");
        assert_eq!(pascal_case("dashboard"), "Dashboard");
    }
}
