use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use crate::pipeline::report::TranslatedFile;
use crate::progress::ProgressEvent;
use crate::translate::PathTranslator;
use anyhow::Result;
use async_trait::async_trait;

/// Rewrites framework routing conventions into the Vite layout
pub struct TranslatePhase;

#[async_trait]
impl PipelinePhase for TranslatePhase {
    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let translator = PathTranslator::new().with_entry_script(context.config.entry_script.clone());
        let files = std::mem::take(&mut context.files);
        let (files, translations) = translator.translate_all(files);
        context.files = files;

        let moved = translations.iter().filter(|t| t.moved_from.is_some()).count();
        context.report.translations = translations
            .into_iter()
            .map(|t| TranslatedFile {
                path: t.file.path,
                moved_from: t.moved_from,
                changes: t.changes,
            })
            .collect();

        context.emit(ProgressEvent::Translated {
            moved,
            changed: context.report.translations.len(),
        });
        Ok(())
    }
}
