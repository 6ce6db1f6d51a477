//! File-routing path rules: page-router and app-router layouts to a flat Vite `src/` tree

use crate::project::{extension_of, pascal_case, strip_extension};
use regex::Regex;
use std::sync::OnceLock;

/// Top-level folders that belong under `src/` in the target layout
const SOURCE_FOLDERS: &[&str] = &["components", "lib", "hooks", "utils", "services", "context"];

/// Target path of the application root component
pub const ENTRY_COMPONENT: &str = "src/App";

/// Kind of move a path rule performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    EntryPage,
    GlobalStyles,
    NestedPage,
    SourceFolder,
    EntryHtml,
}

fn entry_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:src/)?(?:app/page|pages/index)\.(tsx|ts|jsx|js)$")
            .expect("Invalid entry page regex")
    })
}

fn globals_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:src/)?(?:app|styles)/globals\.css$").expect("Invalid globals regex")
    })
}

fn app_route_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:src/)?app/(?:.+/)?([^/]+)/page\.(tsx|ts|jsx|js)$")
            .expect("Invalid app route regex")
    })
}

fn pages_route_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:src/)?pages/([^/]+)\.(tsx|ts|jsx|js)$").expect("Invalid pages regex")
    })
}

/// Component files keep JSX, so a `.ts`/`.js` page becomes `.tsx`/`.jsx`
fn component_extension(ext: &str) -> &'static str {
    match ext {
        "js" | "jsx" => "jsx",
        _ => "tsx",
    }
}

/// Maps a path to its target-layout location. Returns `None` when no rule applies.
pub fn translate_path(path: &str) -> Option<(String, PathRule)> {
    if let Some(caps) = entry_pattern().captures(path) {
        let ext = component_extension(&caps[1]);
        return Some((format!("{}.{}", ENTRY_COMPONENT, ext), PathRule::EntryPage));
    }

    if globals_pattern().is_match(path) {
        return Some(("src/index.css".to_string(), PathRule::GlobalStyles));
    }

    if let Some(caps) = app_route_pattern().captures(path) {
        let name = pascal_case(&caps[1]);
        if !name.is_empty() {
            let ext = component_extension(&caps[2]);
            return Some((format!("src/pages/{}.{}", name, ext), PathRule::NestedPage));
        }
    }

    if let Some(caps) = pages_route_pattern().captures(path) {
        let stem = &caps[1];
        if !stem.starts_with('_') && stem != "index" {
            let name = pascal_case(stem);
            let target = format!("src/pages/{}.{}", name, component_extension(&caps[2]));
            if !name.is_empty() && target != path {
                return Some((target, PathRule::NestedPage));
            }
        }
    }

    if path == "public/index.html" {
        return Some(("index.html".to_string(), PathRule::EntryHtml));
    }

    let top = path.split('/').next().unwrap_or_default();
    if path.contains('/') && SOURCE_FOLDERS.contains(&top) {
        return Some((format!("src/{}", path), PathRule::SourceFolder));
    }

    None
}

/// Maps an extensionless import target the same way [`translate_path`] maps files.
///
/// Used to keep relative imports pointing at files that moved.
pub fn translate_module_path(target: &str) -> String {
    let probe = match extension_of(target) {
        Some(_) => target.to_string(),
        None => format!("{}.tsx", target),
    };
    match translate_path(&probe) {
        Some((moved, _)) if extension_of(target).is_none() => strip_extension(&moved).to_string(),
        Some((moved, _)) => moved,
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        app_page = { "app/page.tsx", "src/App.tsx" },
        src_app_page = { "src/app/page.tsx", "src/App.tsx" },
        pages_index = { "pages/index.tsx", "src/App.tsx" },
        pages_index_js = { "pages/index.js", "src/App.jsx" },
        globals = { "app/globals.css", "src/index.css" },
        nested = { "app/dashboard/settings/page.tsx", "src/pages/Settings.tsx" },
        flat_route = { "app/about-us/page.tsx", "src/pages/AboutUs.tsx" },
        dynamic = { "app/blog/[slug]/page.jsx", "src/pages/Slug.jsx" },
        pages_router = { "pages/contact.tsx", "src/pages/Contact.tsx" },
        components = { "components/Header.tsx", "src/components/Header.tsx" },
        lib = { "lib/utils.ts", "src/lib/utils.ts" },
        context = { "context/AuthContext.tsx", "src/context/AuthContext.tsx" },
        public_html = { "public/index.html", "index.html" },
    )]
    fn test_path_rules(from: &str, to: &str) {
        assert_eq!(translate_path(from).map(|(p, _)| p).as_deref(), Some(to));
    }

    #[parameterized(
        already_src = { "src/components/Header.tsx" },
        root_html = { "index.html" },
        app_underscore = { "pages/_app.tsx" },
        vite_page = { "src/pages/Contact.tsx" },
        main = { "src/main.tsx" },
        root_config = { "vite.config.ts" },
    )]
    fn test_paths_left_alone(path: &str) {
        assert!(translate_path(path).is_none());
    }

    #[test]
    fn test_module_paths() {
        assert_eq!(translate_module_path("components/Header"), "src/components/Header");
        assert_eq!(translate_module_path("lib/utils.ts"), "src/lib/utils.ts");
        assert_eq!(translate_module_path("src/components/Header"), "src/components/Header");
        assert_eq!(translate_module_path("app/page"), "src/App");
    }
}
