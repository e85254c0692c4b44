use super::blocks::flatten;
use super::resolver::{resolve_with, tokens, MissingValuePolicy};
use common::model::block::StructuredContent;
use common::model::context::RenderContext;
use common::model::render::{RenderedDocument, SampleSource};
use common::model::template::DocumentTemplate;
use log::debug;

/// Appended to previews of unsaved content, which are never substituted.
pub const NO_DATA_NOTICE: &str = "<div class=\"preview-notice\" data-preview=\"no-data\">\
Preview without data: placeholders are shown as written and have not been filled in.\
</div>\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    policy: MissingValuePolicy,
}

impl Renderer {
    pub fn new(policy: MissingValuePolicy) -> Self {
        Self { policy }
    }

    /// Resolves the template's stored markup against `context`. The
    /// stylesheet is passed through untouched and the block tree is not
    /// looked at.
    pub fn render(
        &self,
        template: &DocumentTemplate,
        context: &RenderContext,
        sample_source: SampleSource,
    ) -> RenderedDocument {
        let unknown = unknown_placeholders(template);
        if !unknown.is_empty() {
            debug!(
                "Template {} uses placeholders outside its schema snapshot: {}",
                template.id,
                unknown.join(", ")
            );
        }

        let resolution = resolve_with(&template.derived_markup, context, self.policy);
        RenderedDocument {
            markup: resolution.content,
            stylesheet: template.derived_stylesheet.clone(),
            sample_source,
        }
    }

    /// Flattens unsaved content and shows it with its tokens as written,
    /// followed by the no-data notice.
    pub fn render_literal(&self, content: &StructuredContent) -> RenderedDocument {
        let flattened = flatten(content);
        let mut markup = flattened.markup;
        markup.push_str(NO_DATA_NOTICE);
        RenderedDocument {
            markup,
            stylesheet: flattened.stylesheet,
            sample_source: SampleSource::None,
        }
    }
}

/// Tokens in the template's markup that its placeholder snapshot does not define.
pub fn unknown_placeholders(template: &DocumentTemplate) -> Vec<String> {
    tokens(&template.derived_markup)
        .into_iter()
        .filter(|key| {
            !template
                .placeholder_schema_snapshot
                .iter()
                .any(|def| &def.key() == key)
        })
        .collect()
}
