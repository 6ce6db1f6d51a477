use crate::repair::{is_markup_path, PassOutcome, RepairPass};
use crate::validation::{has_export, is_component_like};

/// Reports component files without any export. Never appends one: the
/// intended export shape cannot be guessed from the text.
pub struct ExportCheckPass;

impl RepairPass for ExportCheckPass {
    fn name(&self) -> &'static str {
        "export-check"
    }

    fn applies_to(&self, path: &str) -> bool {
        is_markup_path(path)
    }

    fn apply(&self, path: &str, content: &str) -> PassOutcome {
        let mut outcome = PassOutcome::unchanged(content);
        if is_component_like(path, content) && !has_export(content) {
            outcome
                .warnings
                .push("Component file has no default or named export".to_string());
        }
        outcome
    }
}
