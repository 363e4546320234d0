//! Assembly stage - render the index and write the document set
//!
//! Pure rendering plus the run's only file-system writes. Every index
//! dereference tolerates upstream inconsistency: dangling diagram edges
//! and plan positions without a component or page are logged and skipped,
//! never fatal. Partial output already on disk stays there if a write
//! fails; there is no rollback.

use std::fmt::Write as _;
use std::path::PathBuf;

use console::style;

use crate::core::{Component, PipelineState, Relationship, RunConfig};

/// Fixed attribution line appended to every written document.
const ATTRIBUTION: &str = "Generated by docent";

/// Longest edge label rendered in the dependency diagram.
const MAX_EDGE_LABEL: usize = 30;

/// What the assembly stage wrote.
#[derive(Debug)]
pub struct AssemblyReport {
    pub index_path: PathBuf,
    pub chapter_paths: Vec<PathBuf>,
    pub skipped: usize,
}

/// Strip quotes and newlines from an edge label and cap its length.
///
/// Labels beyond the cap keep their first 27 characters plus `...`, which
/// lands exactly on the cap.
pub fn truncate_edge_label(label: &str) -> String {
    let cleaned: String = label.replace('"', "").replace('\n', " ");
    if cleaned.chars().count() > MAX_EDGE_LABEL {
        let head: String = cleaned.chars().take(MAX_EDGE_LABEL - 3).collect();
        format!("{head}...")
    } else {
        cleaned
    }
}

/// Render the component dependency diagram as a mermaid flowchart.
///
/// One node per component, one edge per relationship with both endpoints
/// in range.
pub fn render_mermaid(components: &[Component], relationships: &[Relationship]) -> String {
    let mut lines = vec!["flowchart TD".to_string()];
    for (i, component) in components.iter().enumerate() {
        let label = component.name.replace('"', "");
        lines.push(format!("    A{i}[\"{label}\"]"));
    }
    for rel in relationships {
        if rel.from >= components.len() || rel.to >= components.len() {
            continue;
        }
        let label = truncate_edge_label(&rel.label);
        lines.push(format!("    A{} -- \"{label}\" --> A{}", rel.from, rel.to));
    }
    lines.join("\n")
}

fn with_attribution(content: &str) -> String {
    let mut out = content.to_string();
    if !out.ends_with("\n\n") {
        out.push_str("\n\n");
    }
    let _ = write!(out, "---\n\n{ATTRIBUTION}");
    out
}

/// Render the index document and the chapter file set.
///
/// Returns the index content, `(file_name, content)` per chapter, and the
/// number of plan positions skipped for missing components or pages.
pub fn render(
    state: &PipelineState,
    project_name: &str,
) -> (String, Vec<(String, String)>, usize) {
    let mut index = format!("# Tutorial: {project_name}\n\n");
    index.push_str(&state.overview);
    index.push_str("\n\n```mermaid\n");
    index.push_str(&render_mermaid(&state.components, &state.relationships));
    index.push_str("\n```\n\n## Chapters\n\n");

    let mut chapters = Vec::new();
    let mut skipped = 0;
    for (position, entry) in state.plan.iter().enumerate() {
        let component = state.component(entry.component_index);
        let page = state.pages.get(position);
        match (component, page) {
            (Some(component), Some(page)) => {
                let _ = writeln!(index, "{}. [{}]({})", entry.number, component.name, entry.file_name);
                chapters.push((entry.file_name.clone(), with_attribution(page)));
            }
            _ => {
                println!(
                    "{} no component or page for chapter {} (component index {}); skipping",
                    style("⚠").yellow(),
                    entry.number,
                    entry.component_index
                );
                skipped += 1;
            }
        }
    }

    (with_attribution(&index), chapters, skipped)
}

/// Write the index and chapter documents under the configured output
/// directory.
pub fn write(state: &PipelineState, config: &RunConfig) -> Result<AssemblyReport, std::io::Error> {
    let (index_content, chapters, skipped) = render(state, &config.project_name);

    std::fs::create_dir_all(&config.output_dir)?;
    let index_path = config.output_dir.join("index.md");
    std::fs::write(&index_path, &index_content)?;

    let mut chapter_paths = Vec::with_capacity(chapters.len());
    for (file_name, content) in &chapters {
        let path = config.output_dir.join(file_name);
        std::fs::write(&path, content)?;
        chapter_paths.push(path);
    }

    Ok(AssemblyReport {
        index_path,
        chapter_paths,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PagePlanEntry;
    use tempfile::tempdir;

    fn component(name: &str) -> Component {
        Component {
            name: name.into(),
            description: String::new(),
            file_indices: Vec::new(),
        }
    }

    fn rel(from: usize, to: usize, label: &str) -> Relationship {
        Relationship {
            from,
            to,
            label: label.into(),
        }
    }

    #[test]
    fn short_labels_pass_through_cleaned() {
        assert_eq!(truncate_edge_label("uses"), "uses");
        assert_eq!(truncate_edge_label("says \"hi\"\nthere"), "says hi there");
    }

    #[test]
    fn long_labels_truncate_to_exactly_thirty() {
        let label = "a".repeat(45);
        let out = truncate_edge_label(&label);
        assert_eq!(out.chars().count(), 30);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..27], &label[..27]);
    }

    #[test]
    fn mermaid_has_node_per_component_and_valid_edges_only() {
        let components = vec![component("A \"quoted\""), component("B")];
        let relationships = vec![rel(0, 1, "uses"), rel(0, 9, "dangling")];
        let diagram = render_mermaid(&components, &relationships);

        assert!(diagram.starts_with("flowchart TD"));
        assert!(diagram.contains("A0[\"A quoted\"]"));
        assert!(diagram.contains("A1[\"B\"]"));
        assert!(diagram.contains("A0 -- \"uses\" --> A1"));
        assert!(!diagram.contains("dangling"));
    }

    fn assembled_state(names: &[&str]) -> PipelineState {
        let mut state = PipelineState::new(Vec::new());
        state.components = names.iter().map(|n| component(n)).collect();
        state.ordering = (0..names.len()).collect();
        state.overview = "An **overview**.".into();
        for (i, name) in names.iter().enumerate() {
            state.plan.push(PagePlanEntry {
                component_index: i,
                number: i + 1,
                title: name.to_string(),
                file_name: crate::core::chapter_file_name(i, name),
                prev: None,
                next: None,
            });
            state.pages.append(format!("# Chapter {}: {name}\n\nbody", i + 1));
        }
        state.pages_processed = names.len();
        state
    }

    #[test]
    fn index_lists_every_chapter_and_carries_attribution() {
        let state = assembled_state(&["Alpha", "Beta"]);
        let (index, chapters, skipped) = render(&state, "demo");

        assert!(index.starts_with("# Tutorial: demo\n\nAn **overview**."));
        assert!(index.contains("1. [Alpha](01_alpha.md)"));
        assert!(index.contains("2. [Beta](02_beta.md)"));
        assert!(index.ends_with("---\n\nGenerated by docent"));
        assert_eq!(chapters.len(), 2);
        assert_eq!(skipped, 0);
        assert!(chapters[0].1.ends_with("---\n\nGenerated by docent"));
    }

    #[test]
    fn missing_page_is_skipped_not_fatal() {
        let mut state = assembled_state(&["Alpha", "Beta"]);
        // Simulate a plan position whose page never got generated.
        state.plan.push(PagePlanEntry {
            component_index: 0,
            number: 3,
            title: "Alpha".into(),
            file_name: "03_alpha.md".into(),
            prev: None,
            next: None,
        });
        let (index, chapters, skipped) = render(&state, "demo");
        assert_eq!(chapters.len(), 2);
        assert_eq!(skipped, 1);
        assert!(!index.contains("03_alpha.md"));
    }

    #[test]
    fn write_creates_index_and_chapter_files() {
        let tmp = tempdir().unwrap();
        let state = assembled_state(&["Alpha"]);
        let config = RunConfig::new("demo", 5, tmp.path().join("out"));

        let report = write(&state, &config).unwrap();
        assert!(report.index_path.exists());
        assert_eq!(report.chapter_paths.len(), 1);
        let chapter = std::fs::read_to_string(&report.chapter_paths[0]).unwrap();
        assert!(chapter.starts_with("# Chapter 1: Alpha"));
        assert!(chapter.ends_with("Generated by docent"));
    }

    #[test]
    fn empty_plan_writes_index_with_no_chapters() {
        let tmp = tempdir().unwrap();
        let state = PipelineState::new(Vec::new());
        let config = RunConfig::new("empty", 5, tmp.path().join("out"));

        let report = write(&state, &config).unwrap();
        assert!(report.index_path.exists());
        assert!(report.chapter_paths.is_empty());
        let index = std::fs::read_to_string(&report.index_path).unwrap();
        assert!(index.contains("## Chapters"));
    }
}
