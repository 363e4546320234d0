//! Prompt construction from embedded Tera templates
//!
//! The textual content of every analysis prompt lives in `templates/`;
//! stages supply pre-rendered context blocks (file listings, component
//! summaries, prior chapters) and this module fills them into the
//! instruction templates.

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const SEGREGATE: &str = "segregate.md.tera";
const RELATIONSHIPS: &str = "relationships.md.tera";
const ORDERING: &str = "ordering.md.tera";
const PAGE: &str = "page.md.tera";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("embedded prompt template missing: {0}")]
    Missing(&'static str),

    #[error("prompt rendering error: {0}")]
    Render(String),
}

/// Context blocks for the page-generation prompt.
#[derive(Debug)]
pub struct PagePromptContext<'a> {
    pub project_name: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub chapter_number: usize,
    pub toc: &'a str,
    /// Concatenation of all previously generated chapters, empty for the
    /// first one.
    pub previous_chapters: &'a str,
    /// Content of every file the component references, empty if none.
    pub files_context: &'a str,
}

/// Renders analysis prompts from the embedded templates.
pub struct PromptSet {
    tera: Tera,
}

impl PromptSet {
    pub fn new() -> Result<Self, PromptError> {
        let mut tera = Tera::default();
        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template_str = std::str::from_utf8(&content.data)
                    .map_err(|e| PromptError::Render(e.to_string()))?;
                tera.add_raw_template(filename, template_str)
                    .map_err(|e| PromptError::Render(e.to_string()))?;
            }
        }
        for required in [SEGREGATE, RELATIONSHIPS, ORDERING, PAGE] {
            if !tera.get_template_names().any(|n| n == required) {
                return Err(PromptError::Missing(required));
            }
        }
        Ok(Self { tera })
    }

    fn render(&self, template: &'static str, context: &tera::Context) -> Result<String, PromptError> {
        self.tera
            .render(template, context)
            .map_err(|e| PromptError::Render(e.to_string()))
    }

    /// Segregation prompt: full file context plus an index listing.
    pub fn segregation(
        &self,
        project_name: &str,
        max_components: usize,
        file_context: &str,
        file_listing: &str,
    ) -> Result<String, PromptError> {
        let mut context = tera::Context::new();
        context.insert("project_name", project_name);
        context.insert("max_components", &max_components);
        context.insert("file_context", file_context);
        context.insert("file_listing", file_listing);
        self.render(SEGREGATE, &context)
    }

    /// Relationship prompt: component summaries plus referenced snippets.
    pub fn relationships(
        &self,
        project_name: &str,
        component_listing: &str,
        component_context: &str,
    ) -> Result<String, PromptError> {
        let mut context = tera::Context::new();
        context.insert("project_name", project_name);
        context.insert("component_listing", component_listing);
        context.insert("component_context", component_context);
        self.render(RELATIONSHIPS, &context)
    }

    /// Ordering prompt: components, overview and relationship narrative.
    pub fn ordering(
        &self,
        project_name: &str,
        components_list: &str,
        overview: &str,
        relationships_list: &str,
    ) -> Result<String, PromptError> {
        let mut context = tera::Context::new();
        context.insert("project_name", project_name);
        context.insert("components_list", components_list);
        context.insert("overview", overview);
        context.insert("relationships_list", relationships_list);
        self.render(ORDERING, &context)
    }

    /// Page prompt for one chapter.
    pub fn page(&self, ctx: &PagePromptContext) -> Result<String, PromptError> {
        let mut context = tera::Context::new();
        context.insert("project_name", ctx.project_name);
        context.insert("name", ctx.name);
        context.insert("description", ctx.description);
        context.insert("chapter_number", &ctx.chapter_number);
        context.insert("toc", ctx.toc);
        context.insert("previous_chapters", ctx.previous_chapters);
        context.insert("files_context", ctx.files_context);
        self.render(PAGE, &context)
    }
}
