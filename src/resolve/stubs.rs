//! Placeholder modules for imports that point at files the model never wrote

use super::imports::ImportBindings;
use super::MissingImport;
use crate::project::{extension_of, pascal_case, strip_extension, SourceFile};

/// Inferred role of a missing module, which decides what its stub renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubRole {
    Layout,
    UiPrimitive,
    Feature,
    Utility,
    Stylesheet,
    Data,
    Image,
    Text,
}

const LAYOUT_HINTS: &[&str] = &[
    "header", "footer", "sidebar", "navbar", "nav", "topbar", "layout", "menu", "shell", "banner",
];

const PRIMITIVE_HINTS: &[&str] = &[
    "button", "card", "input", "modal", "dialog", "badge", "avatar", "tooltip", "select",
    "checkbox", "switch", "tabs", "label", "textarea", "dropdown", "toggle", "spinner", "alert",
    "chip", "tag", "popover", "skeleton", "separator", "slider", "progress",
];

const UTILITY_DIRS: &[&str] = &["lib", "utils", "hooks", "services", "api", "store", "types", "config", "data"];

fn mentions(haystack: &str, hints: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    hints.iter().any(|hint| lower.contains(hint))
}

pub fn role_for(path: &str, name: &str) -> StubRole {
    match extension_of(path) {
        Some("css") | Some("scss") => return StubRole::Stylesheet,
        Some("json") => return StubRole::Data,
        Some("svg") => return StubRole::Image,
        Some("ts") | Some("js") | Some("mjs") | Some("cjs") => return StubRole::Utility,
        Some("tsx") | Some("jsx") => {}
        _ => return StubRole::Text,
    }

    if path.contains("/ui/") || mentions(name, PRIMITIVE_HINTS) {
        StubRole::UiPrimitive
    } else if mentions(name, LAYOUT_HINTS) {
        StubRole::Layout
    } else {
        StubRole::Feature
    }
}

/// Chooses the file a missing extensionless import should be generated at.
///
/// Component-looking imports get `.tsx` (`.jsx` from JavaScript importers);
/// hooks, lowercase helpers and modules under utility folders get `.ts`/`.js`.
pub fn stub_path(candidate: &str, importer: &str, bindings: &ImportBindings) -> String {
    if extension_of(candidate).is_some() {
        return candidate.to_string();
    }

    let javascript = matches!(extension_of(importer), Some("js") | Some("jsx") | Some("mjs") | Some("cjs"));
    let in_utility_dir = candidate
        .split('/')
        .any(|segment| UTILITY_DIRS.contains(&segment));
    let stem = candidate.rsplit('/').next().unwrap_or(candidate);
    let uppercase = |name: &str| name.starts_with(|c: char| c.is_ascii_uppercase());
    let mut value_names = bindings
        .default
        .iter()
        .chain(&bindings.named)
        .chain(&bindings.namespace)
        .peekable();
    // any component among the merged symbols makes the module markup
    let component_name = match value_names.peek() {
        Some(_) => value_names.any(|name| uppercase(name.as_str())),
        None => uppercase(bindings.primary_name().unwrap_or(stem)),
    };
    let hook = stem.starts_with("use") || bindings.primary_name().map(|n| n.starts_with("use")).unwrap_or(false);

    let markup = component_name && !hook && !in_utility_dir;
    let ext = match (markup, javascript) {
        (true, false) => "tsx",
        (true, true) => "jsx",
        (false, false) => "ts",
        (false, true) => "js",
    };
    format!("{}.{}", candidate, ext)
}

fn component_name(path: &str, bindings: &ImportBindings) -> String {
    let stem = strip_extension(path.rsplit('/').next().unwrap_or(path));
    let stem = if stem == "index" {
        path.rsplit('/').nth(1).unwrap_or("Component")
    } else {
        stem
    };
    let name = bindings
        .default
        .clone()
        .unwrap_or_else(|| pascal_case(stem));
    sanitize(name, "Placeholder")
}

fn sanitize(name: String, fallback: &str) -> String {
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{}{}", fallback, name)
    } else {
        name
    }
}

fn component_body(role: StubRole, name: &str, typed: bool) -> String {
    match role {
        StubRole::Layout => format!(
            "export default function {name}() {{\n  return (\n    <div className=\"w-full border-b border-gray-200 bg-gray-50 px-4 py-3 text-sm text-gray-500\">\n      {name}\n    </div>\n  );\n}}\n"
        ),
        StubRole::UiPrimitive => {
            let params = if typed {
                "{ children, className = '', ...props }: { children?: ReactNode; className?: string; [key: string]: any }"
            } else {
                "{ children, className = '', ...props }"
            };
            let import = if typed { "import type { ReactNode } from 'react';\n\n" } else { "" };
            format!(
                "{import}export default function {name}({params}) {{\n  return (\n    <div className={{`rounded-md border border-gray-300 p-2 ${{className}}`}} {{...props}}>\n      {{children}}\n    </div>\n  );\n}}\n"
            )
        }
        _ => format!(
            "export default function {name}() {{\n  return (\n    <section className=\"rounded-md border border-dashed border-gray-300 p-6 text-gray-500\">\n      <h2 className=\"font-semibold\">{name}</h2>\n      <p className=\"text-sm\">Placeholder for a module that was not generated.</p>\n    </section>\n  );\n}}\n"
        ),
    }
}

fn component_stub(path: &str, role: StubRole, bindings: &ImportBindings, typed: bool) -> String {
    let name = component_name(path, bindings);
    let mut content = component_body(role, &name, typed);

    for named in &bindings.named {
        if named == &name {
            content.push_str(&format!("export {{ {} }};\n", named));
        } else if named.starts_with("use") {
            content.push_str(&hook_stub(named, typed));
        } else if named.starts_with(|c: char| c.is_ascii_uppercase()) {
            content.push_str(&format!("export const {} = {};\n", named, name));
        } else {
            content.push_str(&function_stub(named, typed));
        }
    }
    if typed {
        for ty in &bindings.types {
            content.push_str(&format!("export type {} = any;\n", ty));
        }
    }
    content
}

fn hook_stub(name: &str, typed: bool) -> String {
    if typed {
        format!("export function {}(..._args: any[]): any {{\n  return {{}};\n}}\n", name)
    } else {
        format!("export function {}(..._args) {{\n  return {{}};\n}}\n", name)
    }
}

fn function_stub(name: &str, typed: bool) -> String {
    if typed {
        format!("export function {}(..._args: any[]): any {{\n  return undefined;\n}}\n", name)
    } else {
        format!("export function {}(..._args) {{\n  return undefined;\n}}\n", name)
    }
}

fn utility_stub(path: &str, bindings: &ImportBindings, typed: bool) -> String {
    let mut content = String::from("// Placeholder for a module that was not generated.\n");
    let mut exported: Vec<&str> = Vec::new();

    for named in &bindings.named {
        if named.starts_with("use") {
            content.push_str(&hook_stub(named, typed));
        } else if named.starts_with(|c: char| c.is_ascii_uppercase()) {
            let annotation = if typed { ": any" } else { "" };
            content.push_str(&format!("export const {}{} = {{}};\n", named, annotation));
        } else {
            content.push_str(&function_stub(named, typed));
        }
        exported.push(named);
    }
    if typed {
        for ty in &bindings.types {
            content.push_str(&format!("export type {} = any;\n", ty));
        }
    }

    let stem = strip_extension(path.rsplit('/').next().unwrap_or(path));
    let local = bindings.default.clone().unwrap_or_else(|| {
        let pascal = pascal_case(stem);
        let mut chars = pascal.chars();
        match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    });
    let local = sanitize(local, "placeholder");

    if exported.contains(&local.as_str()) {
        content.push_str(&format!("export default {};\n", local));
    } else if local.starts_with("use") {
        content.push_str(&hook_stub(&local, typed).replacen("export function", "export default function", 1));
    } else {
        content.push_str(&function_stub(&local, typed).replacen("export function", "export default function", 1));
    }
    content
}

/// Builds the stub file for one missing module
pub fn generate_stub(missing: &MissingImport) -> SourceFile {
    let path = missing.candidate_path.as_str();
    let role = role_for(path, &missing.imported_name);
    let typed = matches!(extension_of(path), Some("tsx") | Some("ts"));

    let content = match role {
        StubRole::Stylesheet => "/* Placeholder stylesheet for a module that was not generated. */\n".to_string(),
        StubRole::Data => "{}\n".to_string(),
        StubRole::Image => {
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"24\" height=\"24\" viewBox=\"0 0 24 24\"></svg>\n".to_string()
        }
        StubRole::Text => String::new(),
        StubRole::Utility => utility_stub(path, &missing.bindings, typed),
        StubRole::Layout | StubRole::UiPrimitive | StubRole::Feature => {
            component_stub(path, role, &missing.bindings, typed)
        }
    };
    SourceFile::new(path, content)
}
