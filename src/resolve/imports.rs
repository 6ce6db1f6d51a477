//! Module specifier scanning for every import form the generated code uses

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportForm {
    /// `import x from '...'`
    Static,
    /// `import '...'`
    SideEffect,
    /// `export ... from '...'`
    ReExport,
    /// `import('...')`
    Dynamic,
    /// `require('...')`
    Require,
}

/// Names an import statement binds from its module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBindings {
    pub default: Option<String>,
    pub named: Vec<String>,
    /// Names imported with `type` (`import type { A }`, `{ type B }`)
    pub types: Vec<String>,
    pub namespace: Option<String>,
}

impl ImportBindings {
    /// The symbol a stub for this module is named after
    pub fn primary_name(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.named.first().map(String::as_str))
            .or(self.namespace.as_deref())
            .or_else(|| self.types.first().map(String::as_str))
    }

    pub fn merge(&mut self, other: &ImportBindings) {
        if self.default.is_none() {
            self.default = other.default.clone();
        }
        if self.namespace.is_none() {
            self.namespace = other.namespace.clone();
        }
        for name in &other.named {
            if !self.named.contains(name) {
                self.named.push(name.clone());
            }
        }
        for name in &other.types {
            if !self.types.contains(name) && !self.named.contains(name) {
                self.types.push(name.clone());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub specifier: String,
    pub form: ImportForm,
    pub bindings: ImportBindings,
    /// Byte offset of the statement in the file
    pub offset: usize,
}

fn static_import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*import\s+(type\s+)?([^'";=()<>]*?)\s+from\s*['"]([^'"\n]+)['"]"#)
            .expect("Invalid static import regex")
    })
}

fn side_effect_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*import\s*['"]([^'"\n]+)['"]"#).expect("Invalid side effect regex")
    })
}

fn reexport_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*export\s+(type\s+)?([^'";=()<>]*?)\s+from\s*['"]([^'"\n]+)['"]"#)
            .expect("Invalid re-export regex")
    })
}

fn call_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b(import|require)\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("Invalid call regex")
    })
}

fn identifier(raw: &str) -> Option<String> {
    let name = raw.trim();
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    valid.then(|| name.to_string())
}

/// Parses a named list body (`a, b as c, type D, default as E`)
fn parse_named(list: &str, type_only: bool, bindings: &mut ImportBindings) {
    for item in list.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (is_type, item) = match item.strip_prefix("type ") {
            Some(rest) => (true, rest.trim()),
            None => (type_only, item),
        };
        let source = item.split(" as ").next().unwrap_or(item);
        let Some(name) = identifier(source) else {
            continue;
        };
        if name == "default" {
            let local = item.rsplit(" as ").next().and_then(identifier);
            if bindings.default.is_none() {
                bindings.default = local;
            }
        } else if is_type {
            bindings.types.push(name);
        } else {
            bindings.named.push(name);
        }
    }
}

/// Parses the clause between `import` and `from`
pub fn parse_clause(clause: &str, type_only: bool) -> ImportBindings {
    let mut bindings = ImportBindings::default();
    let clause = clause.trim();

    let (head, braces) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{} {}", &clause[..open], &clause[close + 1..]),
            Some(&clause[open + 1..close]),
        ),
        _ => (clause.to_string(), None),
    };

    if let Some(list) = braces {
        parse_named(list, type_only, &mut bindings);
    }

    for part in head.split(',') {
        let part = part.trim();
        if let Some(alias) = part.strip_prefix('*') {
            bindings.namespace = alias.trim().strip_prefix("as").and_then(identifier);
        } else if let Some(name) = identifier(part) {
            if type_only {
                bindings.types.push(name);
            } else {
                bindings.default = Some(name);
            }
        }
    }
    bindings
}

fn in_comment(content: &str, offset: usize) -> bool {
    let line_start = content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = content[line_start..offset].trim_start();
    prefix.starts_with("//") || prefix.starts_with('*') || prefix.starts_with("/*")
}

/// Every import of a file, in source order
pub fn parse_imports(content: &str) -> Vec<ImportStatement> {
    let mut statements = Vec::new();

    for caps in static_import_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        statements.push(ImportStatement {
            specifier: caps[3].to_string(),
            form: ImportForm::Static,
            bindings: parse_clause(&caps[2], caps.get(1).is_some()),
            offset: whole.start(),
        });
    }

    for caps in side_effect_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        statements.push(ImportStatement {
            specifier: caps[1].to_string(),
            form: ImportForm::SideEffect,
            bindings: ImportBindings::default(),
            offset: whole.start(),
        });
    }

    for caps in reexport_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let type_only = caps.get(1).is_some();
        let clause = caps[2].trim();
        let bindings = if clause.starts_with('*') {
            ImportBindings::default()
        } else {
            let mut bindings = ImportBindings::default();
            let list = clause.trim_start_matches('{').trim_end_matches('}');
            parse_named(list, type_only, &mut bindings);
            bindings
        };
        statements.push(ImportStatement {
            specifier: caps[3].to_string(),
            form: ImportForm::ReExport,
            bindings,
            offset: whole.start(),
        });
    }

    for caps in call_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        if in_comment(content, whole.start()) {
            continue;
        }
        let form = if &caps[1] == "import" {
            ImportForm::Dynamic
        } else {
            ImportForm::Require
        };
        statements.push(ImportStatement {
            specifier: caps[2].to_string(),
            form,
            bindings: ImportBindings::default(),
            offset: whole.start(),
        });
    }

    statements.sort_by_key(|s| s.offset);
    statements
}

/// Bare module specifiers (packages), in source order
pub fn package_specifiers(content: &str) -> Vec<String> {
    parse_imports(content)
        .into_iter()
        .map(|s| s.specifier)
        .filter(|s| !s.starts_with('.') && !s.starts_with('/'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_forms() {
        let content = r#"import React, { useState, type FC } from 'react';
import './index.css';
import * as utils from "../lib/utils";
import type { Props } from './types';
import {
  Card,
  CardHeader as Header,
} from '@/components/ui/card';
export { default as Badge } from './widgets/Badge';
export * from './shared';
const Lazy = React.lazy(() => import('./pages/Lazy'));
const fs = require('fs');
// import Ghost from './ghost';
"#;
        let imports = parse_imports(content);
        let specs: Vec<&str> = imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(
            specs,
            vec![
                "react",
                "./index.css",
                "../lib/utils",
                "./types",
                "@/components/ui/card",
                "./widgets/Badge",
                "./shared",
                "./pages/Lazy",
                "fs",
            ]
        );

        assert_eq!(imports[0].bindings.default.as_deref(), Some("React"));
        assert_eq!(imports[0].bindings.named, vec!["useState"]);
        assert_eq!(imports[0].bindings.types, vec!["FC"]);
        assert_eq!(imports[2].bindings.namespace.as_deref(), Some("utils"));
        assert_eq!(imports[3].bindings.types, vec!["Props"]);
        assert_eq!(imports[4].bindings.named, vec!["Card", "CardHeader"]);
        assert_eq!(imports[5].bindings.default.as_deref(), Some("Badge"));
        assert_eq!(imports[7].form, ImportForm::Dynamic);
        assert_eq!(imports[8].form, ImportForm::Require);
    }

    #[test]
    fn test_package_specifiers() {
        let content = "import { motion } from 'framer-motion';\nimport App from './App';\nimport logo from '/logo.svg';\n";
        assert_eq!(package_specifiers(content), vec!["framer-motion"]);
    }

    #[test]
    fn test_primary_name() {
        let bindings = parse_clause("{ cn, formatDate }", false);
        assert_eq!(bindings.primary_name(), Some("cn"));
        assert_eq!(parse_clause("Badge", false).primary_name(), Some("Badge"));
    }
}
