//! End-to-end pipeline tests
//!
//! These drive the public API from raw LLM text or file lists to the final
//! project. Escalation runs against MockLLMClient, so no backend is needed.

use fencefix::deps::known_package;
use fencefix::escalation::LlmFixer;
use fencefix::llm::{BackendError, MockLLMClient, MockResponse};
use fencefix::project::MANIFEST_PATH;
use fencefix::{
    extract_files, DependencyManifest, FileSet, ImportResolver, PipelineConfig, PipelineOrchestrator,
    Repairer, SourceFile,
};
use std::sync::Arc;

const UNCLOSED_APP: &str = "export default function App() {\n  return <div>hi</div>;\n";
const CLOSED_APP: &str = "export default function App() {\n  return <div>hi</div>;\n}\n";

fn orchestrator() -> PipelineOrchestrator {
    PipelineOrchestrator::new(PipelineConfig::default())
}

fn file<'a>(files: &'a [SourceFile], path: &str) -> &'a SourceFile {
    files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("{} missing from output", path))
}

fn fixer_reply(path: &str, content: &str) -> MockResponse {
    MockResponse::text(format!(
        "Here is the corrected file:\n\n```json\n{}\n```\n",
        serde_json::json!({
            "files": [{ "path": path, "content": content, "wasFixed": true, "fixes": ["closed function body"] }]
        })
    ))
}

#[tokio::test]
async fn test_hero_block_extracted_and_self_closed() {
    let text = "Here is the hero section:\n\n```tsx\n// src/components/Hero.tsx\nexport default function Hero(){ return <img src=\"x\"> }\n```\n";

    let output = orchestrator().run_text(text).await.unwrap();

    assert_eq!(output.report.extracted, 1);
    let hero = file(&output.files, "src/components/Hero.tsx");
    assert!(hero.content.contains("<img src=\"x\" />"), "{}", hero.content);
    assert!(!hero.content.contains("<img src=\"x\">"));
}

#[tokio::test]
async fn test_missing_badge_gets_default_export_stub() {
    let files = vec![SourceFile::new(
        "src/App.tsx",
        "import Badge from './widgets/Badge';\n\nexport default function App() {\n  return <Badge />;\n}\n",
    )];

    let output = orchestrator().run_files(files).await.unwrap();

    assert_eq!(output.report.missing_imports.len(), 1);
    assert_eq!(output.report.missing_imports[0].imported_name, "Badge");
    assert_eq!(output.report.stubs, vec!["src/widgets/Badge.tsx"]);
    assert_eq!(output.report.stub_count, 1);

    let stub = file(&output.files, "src/widgets/Badge.tsx");
    assert!(stub.content.contains("export default"));
    assert!(output
        .report
        .warnings
        .iter()
        .any(|w| w.contains("src/widgets/Badge.tsx")));
}

#[tokio::test]
async fn test_manifest_created_with_pinned_versions() {
    let files = vec![SourceFile::new(
        "src/App.tsx",
        "import { Menu } from 'lucide-react';\nimport clsx from 'clsx';\n\nexport default function App() {\n  return <Menu className={clsx('a')} />;\n}\n",
    )];

    let output = orchestrator().run_files(files).await.unwrap();

    assert!(output.report.dependencies.manifest_created);
    let manifest = DependencyManifest::parse(&file(&output.files, MANIFEST_PATH).content).unwrap();
    for name in ["lucide-react", "clsx"] {
        let pinned = known_package(name).map(|p| p.version);
        assert_eq!(manifest.version_of(name), pinned, "{}", name);
    }
}

#[tokio::test]
async fn test_truncated_attribute_before_new_tag_is_closed() {
    let content = "export default function Card() {\n  return (\n    <section>\n  <div className=\"px-4\n  <p>Hello</p>\n    </section>\n  );\n}\n";
    let output = orchestrator()
        .run_files(vec![SourceFile::new("src/components/Card.tsx", content)])
        .await
        .unwrap();

    let card = file(&output.files, "src/components/Card.tsx");
    assert!(card.content.contains("  <div className=\"px-4\">\n  <p>Hello</p>"), "{}", card.content);
}

#[tokio::test]
async fn test_truncated_attribute_at_end_of_file_is_reported() {
    let content = "export default function Card() {\n  return (\n  <div className=\"px-4";
    let output = orchestrator()
        .run_files(vec![SourceFile::new("src/components/Card.tsx", content)])
        .await
        .unwrap();

    let card = file(&output.files, "src/components/Card.tsx");
    assert!(card.content.trim_end().ends_with("<div className=\"px-4"));

    let finding = output
        .report
        .findings
        .iter()
        .find(|f| f.path == "src/components/Card.tsx")
        .expect("truncated file must be reported");
    assert!(finding
        .messages
        .iter()
        .any(|m| m.contains("Attribute value left open")));
}

#[test]
fn test_repair_reaches_fixed_point() {
    let corpus = [
        ("src/A.tsx", "export default function A() {\n  return <img src=\"x\"><br>;\n}\n"),
        ("src/B.tsx", "import React from react\nexport const B = () => <div class=\"p-2\">hi</div>\n"),
        ("src/C.tsx", "export default function C() {\n  return <div>\n  <input type=\"text\"></input>\n  </div>;\n}\n\n\n\n"),
        ("src/D.jsx", "'use client'\nexport default function D() {\n  return <div className=\"px-4\n  <p>x</p>\n}\n"),
    ];
    let repairer = Repairer::default();

    for (path, content) in corpus {
        let first = repairer.repair(path, content);
        let second = repairer.repair(path, &first.content);
        assert!(second.fixes.is_empty(), "{} not idempotent: {:?}", path, second.fixes);
        assert_eq!(second.content, first.content);
    }
}

#[test]
fn test_every_non_empty_block_becomes_a_file() {
    let text = "First the entry:\n```tsx\n// src/main.tsx\nimport App from './App';\n```\n\nThen styles:\n```css\nbody { margin: 0; }\n```\n\nNothing here:\n```\n\n```\n\nAnd a component:\n```tsx\nexport default function Footer() { return <footer />; }\n```\n";

    let files = extract_files(text);
    assert_eq!(files.len(), 3);

    let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 3);
    assert!(files.iter().all(|f| !f.path.is_empty()));
}

#[tokio::test]
async fn test_output_resolves_completely() {
    let text = "```tsx\n// src/App.tsx\nimport Header from './components/Header';\nimport { Button, buttonVariants } from '@/components/ui/button';\nimport { useCart } from './hooks/useCart';\n\nexport default function App() {\n  const cart = useCart();\n  return <div><Header /><Button className={buttonVariants()} /></div>;\n}\n```\n";

    let output = orchestrator().run_text(text).await.unwrap();
    assert!(output.report.stub_count >= 3);

    let files: FileSet = output.files.into_iter().collect();
    let report = ImportResolver::new().resolve(&files);
    assert!(report.valid, "{:?}", report.missing_imports);
}

#[tokio::test]
async fn test_escalation_accepts_fixed_file() {
    let client = Arc::new(MockLLMClient::new());
    client.add_response(fixer_reply("src/App.tsx", CLOSED_APP));

    let orchestrator = PipelineOrchestrator::new(PipelineConfig::default().with_escalation(true))
        .with_fixer(Arc::new(LlmFixer::new(client.clone())));
    let output = orchestrator
        .run_files(vec![SourceFile::new("src/App.tsx", UNCLOSED_APP)])
        .await
        .unwrap();

    assert_eq!(client.request_count(), 1);
    let summary = output.report.escalation.as_ref().expect("escalation should run");
    assert_eq!(summary.accepted, vec!["src/App.tsx"]);
    assert!(output.report.is_clean(), "{:?}", output.report.findings);
    assert!(file(&output.files, "src/App.tsx").content.trim_end().ends_with('}'));
}

#[tokio::test]
async fn test_escalation_failure_keeps_local_files() {
    let client = Arc::new(MockLLMClient::new());
    client.add_response(MockResponse::error(BackendError::ApiError {
        message: "connection refused".to_string(),
        status_code: None,
    }));

    let orchestrator = PipelineOrchestrator::new(PipelineConfig::default().with_escalation(true))
        .with_fixer(Arc::new(LlmFixer::new(client)));
    let output = orchestrator
        .run_files(vec![SourceFile::new("src/App.tsx", UNCLOSED_APP)])
        .await
        .unwrap();

    let summary = output.report.escalation.expect("escalation should run");
    assert!(summary.accepted.is_empty());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(output.report.findings.len(), 1);
    assert!(file(&output.files, "src/App.tsx").content.contains("return <div>hi</div>;"));
}

#[tokio::test]
async fn test_escalation_disabled_by_default() {
    let client = Arc::new(MockLLMClient::new());
    let orchestrator = orchestrator().with_fixer(Arc::new(LlmFixer::new(client.clone())));

    let output = orchestrator
        .run_files(vec![SourceFile::new("src/App.tsx", UNCLOSED_APP)])
        .await
        .unwrap();

    assert_eq!(client.request_count(), 0);
    assert!(output.report.escalation.is_none());
    assert_eq!(output.report.findings.len(), 1);
}
