//! The default repair passes, one per file, in execution order

mod attribute_leak;
mod class_name;
mod cleanup;
mod export_check;
mod import_hygiene;
mod template_literal;
mod truncation;
mod void_elements;

pub use attribute_leak::AttributeLeakPass;
pub use class_name::ClassNamePass;
pub use cleanup::CleanupPass;
pub use export_check::ExportCheckPass;
pub use import_hygiene::ImportHygienePass;
pub use template_literal::TemplateLiteralPass;
pub use truncation::TruncationPass;
pub use void_elements::VoidElementPass;

use super::RepairPass;

pub fn default_passes() -> Vec<Box<dyn RepairPass>> {
    vec![
        Box::new(TemplateLiteralPass),
        Box::new(AttributeLeakPass),
        Box::new(VoidElementPass),
        Box::new(ClassNamePass),
        Box::new(ImportHygienePass),
        Box::new(TruncationPass),
        Box::new(ExportCheckPass),
        Box::new(CleanupPass),
    ]
}
