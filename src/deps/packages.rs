//! Known-good package pins and module specifier classification

/// Where a package belongs in the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dependencies,
    DevDependencies,
}

impl Section {
    pub fn key(self) -> &'static str {
        match self {
            Section::Dependencies => "dependencies",
            Section::DevDependencies => "devDependencies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownPackage {
    pub name: &'static str,
    pub version: &'static str,
    pub section: Section,
}

const fn dep(name: &'static str, version: &'static str) -> KnownPackage {
    KnownPackage {
        name,
        version,
        section: Section::Dependencies,
    }
}

const fn dev(name: &'static str, version: &'static str) -> KnownPackage {
    KnownPackage {
        name,
        version,
        section: Section::DevDependencies,
    }
}

pub const KNOWN_PACKAGES: &[KnownPackage] = &[
    dep("react", "^18.3.1"),
    dep("react-dom", "^18.3.1"),
    dep("react-router-dom", "^6.26.2"),
    dep("react-router", "^6.26.2"),
    dep("lucide-react", "^0.462.0"),
    dep("clsx", "^2.1.1"),
    dep("tailwind-merge", "^2.5.4"),
    dep("class-variance-authority", "^0.7.1"),
    dep("framer-motion", "^11.11.17"),
    dep("date-fns", "^3.6.0"),
    dep("dayjs", "^1.11.13"),
    dep("zustand", "^4.5.5"),
    dep("immer", "^10.1.1"),
    dep("axios", "^1.7.7"),
    dep("@tanstack/react-query", "^5.59.16"),
    dep("react-hook-form", "^7.53.2"),
    dep("@hookform/resolvers", "^3.9.1"),
    dep("zod", "^3.23.8"),
    dep("recharts", "^2.13.3"),
    dep("sonner", "^1.7.0"),
    dep("react-hot-toast", "^2.4.1"),
    dep("uuid", "^10.0.0"),
    dep("lodash", "^4.17.21"),
    dep("react-icons", "^5.3.0"),
    dep("@heroicons/react", "^2.1.5"),
    dep("@headlessui/react", "^2.2.0"),
    dep("react-markdown", "^9.0.1"),
    dep("next-themes", "^0.4.3"),
    dep("cmdk", "^1.0.0"),
    dep("vaul", "^1.1.1"),
    dep("embla-carousel-react", "^8.3.1"),
    dep("react-day-picker", "^8.10.1"),
    dep("react-resizable-panels", "^2.1.6"),
    dep("input-otp", "^1.4.1"),
    dep("@supabase/supabase-js", "^2.45.4"),
    dep("@radix-ui/react-accordion", "^1.2.1"),
    dep("@radix-ui/react-avatar", "^1.1.1"),
    dep("@radix-ui/react-checkbox", "^1.1.2"),
    dep("@radix-ui/react-dialog", "^1.1.2"),
    dep("@radix-ui/react-dropdown-menu", "^2.1.2"),
    dep("@radix-ui/react-label", "^2.1.0"),
    dep("@radix-ui/react-popover", "^1.1.2"),
    dep("@radix-ui/react-progress", "^1.1.0"),
    dep("@radix-ui/react-scroll-area", "^1.2.1"),
    dep("@radix-ui/react-select", "^2.1.2"),
    dep("@radix-ui/react-separator", "^1.1.0"),
    dep("@radix-ui/react-slot", "^1.1.0"),
    dep("@radix-ui/react-switch", "^1.1.1"),
    dep("@radix-ui/react-tabs", "^1.1.1"),
    dep("@radix-ui/react-toast", "^1.2.2"),
    dep("@radix-ui/react-tooltip", "^1.1.3"),
    dev("vite", "^5.4.10"),
    dev("@vitejs/plugin-react", "^4.3.3"),
    dev("typescript", "^5.6.3"),
    dev("@types/react", "^18.3.12"),
    dev("@types/react-dom", "^18.3.1"),
    dev("tailwindcss", "^3.4.14"),
    dev("autoprefixer", "^10.4.20"),
    dev("postcss", "^8.4.47"),
];

const NODE_BUILTINS: &[&str] = &[
    "assert", "buffer", "child_process", "crypto", "dns", "events", "fs", "http", "https",
    "module", "net", "os", "path", "process", "querystring", "readline", "stream", "tls", "url",
    "util", "worker_threads", "zlib",
];

pub fn known_package(name: &str) -> Option<&'static KnownPackage> {
    KNOWN_PACKAGES.iter().find(|p| p.name == name)
}

/// Node built-in modules, with or without the `node:` scheme
pub fn is_builtin(specifier: &str) -> bool {
    if specifier.starts_with("node:") {
        return true;
    }
    let root = specifier.split('/').next().unwrap_or(specifier);
    NODE_BUILTINS.contains(&root)
}

/// Extracts the installable package name from a bare module specifier.
///
/// Returns `None` for relative paths, aliases, URLs, virtual modules and
/// built-ins, none of which belong in a manifest.
pub fn package_root(specifier: &str) -> Option<&str> {
    let spec = specifier.split(['?', '#']).next().unwrap_or(specifier).trim();
    if spec.is_empty()
        || spec.starts_with('.')
        || spec.starts_with('/')
        || spec.starts_with("@/")
        || spec.starts_with('~')
        || spec.starts_with("virtual:")
        || spec.contains("://")
        || spec.starts_with("data:")
        || is_builtin(spec)
    {
        return None;
    }

    if spec.starts_with('@') {
        let mut parts = spec.splitn(3, '/');
        let scope = parts.next()?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        Some(&spec[..scope.len() + 1 + name.len()])
    } else {
        spec.split('/').next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        plain = { "react", Some("react") },
        subpath = { "react-dom/client", Some("react-dom") },
        scoped = { "@tanstack/react-query", Some("@tanstack/react-query") },
        scoped_subpath = { "@radix-ui/react-icons/dist/x", Some("@radix-ui/react-icons") },
        scope_only = { "@radix-ui", None },
        relative = { "./App", None },
        alias = { "@/lib/utils", None },
        url = { "https://esm.sh/react", None },
        builtin = { "node:fs", None },
        bare_builtin = { "path", None },
        virtual_module = { "virtual:pwa-register", None },
        query = { "lodash/debounce?x", Some("lodash") },
    )]
    fn test_package_root(specifier: &str, expected: Option<&str>) {
        assert_eq!(package_root(specifier), expected);
    }

    #[test]
    fn test_known_packages_unique() {
        for (idx, pkg) in KNOWN_PACKAGES.iter().enumerate() {
            assert!(
                KNOWN_PACKAGES[idx + 1..].iter().all(|p| p.name != pkg.name),
                "duplicate {}",
                pkg.name
            );
        }
        assert_eq!(known_package("clsx").map(|p| p.version), Some("^2.1.1"));
        assert!(known_package("left-pad").is_none());
    }
}
