// Ordered phases of a fencefix run. Each phase is one stage of the
// LLM-output-to-project pipeline and only touches the shared context.

#[path = "01_extract.rs"]
pub mod extract;
#[path = "02_translate.rs"]
pub mod translate;
#[path = "03_repair.rs"]
pub mod repair;
#[path = "04_resolve.rs"]
pub mod resolve;
#[path = "05_dependencies.rs"]
pub mod dependencies;
#[path = "06_validate.rs"]
pub mod validate;
#[path = "07_escalate.rs"]
pub mod escalate;
