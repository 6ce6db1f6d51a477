//! Path inference from exported symbols, and synthetic fallback names

use regex::Regex;
use std::sync::OnceLock;

/// Component names that map to the application entry page
const ENTRY_COMPONENTS: &[&str] = &["App", "Page", "Home", "Index"];

/// Language family of a fenced block, used to pick file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFamily {
    TypeScript,
    JavaScript,
}

impl ScriptFamily {
    /// Returns the script family for a fence language tag, or `None` for non-script blocks.
    ///
    /// An empty tag is treated as TypeScript, the target project's default.
    pub fn from_language(language: &str) -> Option<Self> {
        match language {
            "" | "tsx" | "ts" | "typescript" | "typescriptreact" | "react" => {
                Some(ScriptFamily::TypeScript)
            }
            "jsx" | "js" | "javascript" | "javascriptreact" | "mjs" => {
                Some(ScriptFamily::JavaScript)
            }
            _ => None,
        }
    }

    fn extension(self, has_jsx: bool) -> &'static str {
        match (self, has_jsx) {
            (ScriptFamily::TypeScript, true) => "tsx",
            (ScriptFamily::TypeScript, false) => "ts",
            (ScriptFamily::JavaScript, true) => "jsx",
            (ScriptFamily::JavaScript, false) => "js",
        }
    }
}

fn export_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"export\s+default\s+(?:async\s+)?function\s+([A-Za-z_$][\w$]*)",
            r"export\s+default\s+class\s+([A-Za-z_$][\w$]*)",
            r"(?m)export\s+default\s+([A-Za-z_$][\w$]*)\s*;?\s*$",
            r"export\s+(?:const|let|function|class)\s+([A-Za-z_$][\w$]*)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid export regex"))
        .collect()
    })
}

fn jsx_pattern() -> &'static Regex {
    static JSX: OnceLock<Regex> = OnceLock::new();
    JSX.get_or_init(|| {
        Regex::new(r"(?m)(?:return\s*\(?\s*<[A-Za-z>]|=>\s*\(?\s*<[A-Za-z>]|</[A-Za-z][\w.]*>|/>)")
            .expect("Invalid JSX regex")
    })
}

/// Finds the primary exported symbol of a block
pub fn exported_symbol(body: &str) -> Option<String> {
    export_patterns()
        .iter()
        .find_map(|re| re.captures(body))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the body appears to contain JSX markup
pub fn contains_jsx(body: &str) -> bool {
    jsx_pattern().is_match(body)
}

/// Infers a conventional path from the block's exported symbol
pub fn infer_path(language: &str, body: &str) -> Option<String> {
    let family = ScriptFamily::from_language(language)?;
    let symbol = exported_symbol(body)?;
    let has_jsx = contains_jsx(body);

    if ENTRY_COMPONENTS.contains(&symbol.as_str()) {
        return Some(format!("src/App.{}", family.extension(true)));
    }

    if is_hook_name(&symbol) {
        return Some(format!("src/hooks/{}.{}", symbol, family.extension(has_jsx)));
    }

    Some(format!(
        "src/components/{}.{}",
        symbol,
        family.extension(has_jsx)
    ))
}

/// `useThing` style names
pub fn is_hook_name(name: &str) -> bool {
    name.strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

/// File extension for a fence language tag
pub fn extension_for_language(language: &str) -> &'static str {
    match language {
        "tsx" | "typescriptreact" | "react" => "tsx",
        "ts" | "typescript" => "ts",
        "jsx" | "javascriptreact" => "jsx",
        "js" | "javascript" | "mjs" => "js",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "html" => "html",
        "md" | "markdown" => "md",
        "svg" | "xml" => "svg",
        "sh" | "bash" | "shell" | "zsh" => "sh",
        "yml" | "yaml" => "yml",
        _ => "txt",
    }
}

/// Last-resort unique name derived from the language tag
pub fn synthetic_path(language: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "src/generated/block-{}.{}",
        &suffix[..8],
        extension_for_language(language)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_components() {
        let body = "export default function Page() { return <main />; }";
        assert_eq!(infer_path("tsx", body).as_deref(), Some("src/App.tsx"));

        let body = "function Home() { return <div>hi</div>; }\nexport default Home;\n";
        assert_eq!(infer_path("jsx", body).as_deref(), Some("src/App.jsx"));
    }

    #[test]
    fn test_component_directory() {
        let body = "export default function PricingCard() {\n  return (\n    <div />\n  );\n}";
        assert_eq!(
            infer_path("tsx", body).as_deref(),
            Some("src/components/PricingCard.tsx")
        );
    }

    #[test]
    fn test_hook_and_plain_module() {
        let hook = "export function useCart() { return { items: [] }; }";
        assert_eq!(infer_path("ts", hook).as_deref(), Some("src/hooks/useCart.ts"));

        let helper = "export const formatPrice = (n: number) => `$${n}`;";
        assert_eq!(
            infer_path("typescript", helper).as_deref(),
            Some("src/components/formatPrice.ts")
        );
    }

    #[test]
    fn test_non_script_blocks_are_not_inferred() {
        assert!(infer_path("css", "export default function X() {}").is_none());
        assert!(infer_path("tsx", "const x = 1;").is_none());
    }

    #[test]
    fn test_synthetic_paths_are_unique() {
        let a = synthetic_path("bash");
        let b = synthetic_path("bash");
        assert!(a.starts_with("src/generated/block-"));
        assert!(a.ends_with(".sh"));
        assert_ne!(a, b);
        assert_eq!(synthetic_path("brainfuck").rsplit('.').next(), Some("txt"));
    }

    #[test]
    fn test_hook_names() {
        assert!(is_hook_name("useAuth"));
        assert!(!is_hook_name("user"));
        assert!(!is_hook_name("use"));
    }
}
