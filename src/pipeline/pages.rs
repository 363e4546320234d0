//! Page loop - generate one chapter per plan entry
//!
//! Two states: pages remaining and done. Each iteration makes one
//! unconstrained service call whose context embeds the component details,
//! the shared table of contents, every previously generated page in order
//! and the content of the files the component references. The forward
//! dependency on prior pages is why iterations never overlap.

use console::style;

use crate::core::{PipelineState, RunConfig};
use crate::llm::{AnalysisClient, AnalysisRequest};
use crate::prompt::{PagePromptContext, PromptSet};

use super::{PipelineError, Stage};

const STAGE: Stage = Stage::PageGeneration;

/// Separator between prior chapters in the generation context.
const PAGE_SEPARATOR: &str = "\n--------\n";

/// Process the plan entry at the loop cursor and advance it.
///
/// Callers drive the loop with [`PipelineState::has_remaining_pages`]; a
/// call with nothing remaining is a no-op.
pub fn process_next(
    state: &mut PipelineState,
    config: &RunConfig,
    client: &dyn AnalysisClient,
    prompts: &PromptSet,
) -> Result<(), PipelineError> {
    let Some(entry) = state.plan.get(state.pages_processed).cloned() else {
        return Ok(());
    };
    let Some(component) = state.component(entry.component_index).cloned() else {
        println!(
            "{} plan entry {} references missing component {}; skipping",
            style("⚠").yellow(),
            entry.number,
            entry.component_index
        );
        // Keep the page log aligned with plan positions: assembly pairs
        // plan entry N with page N, so the skipped slot still gets a row.
        state.pages.append(String::new());
        state.pages_processed += 1;
        return Ok(());
    };

    let files_context = component
        .file_indices
        .iter()
        .filter_map(|&i| state.file(i))
        .map(|file| format!("# {}\n\n{}", file.path, file.content))
        .collect::<Vec<_>>()
        .join("\n");
    let previous_chapters = state.pages.joined(PAGE_SEPARATOR);

    let context = prompts
        .page(&PagePromptContext {
            project_name: &config.project_name,
            name: &component.name,
            description: &component.description,
            chapter_number: entry.number,
            toc: &state.toc,
            previous_chapters: &previous_chapters,
            files_context: &files_context,
        })
        .map_err(|source| PipelineError::Prompt { stage: STAGE, source })?;

    let content = client
        .invoke(&AnalysisRequest::text(&context))
        .map_err(|source| PipelineError::Service { stage: STAGE, source })?;

    let page = ensure_heading(&content, entry.number, &component.name);
    state.pages.append(page);
    state.pages_processed += 1;
    Ok(())
}

/// Force the page to open with its chapter heading.
///
/// If the response already starts with `# Chapter {n}` it is kept as-is.
/// Otherwise a leading heading of any kind is rewritten, and a page with
/// no heading at all gets one prepended.
fn ensure_heading(content: &str, number: usize, name: &str) -> String {
    let heading = format!("# Chapter {number}: {name}");
    let trimmed = content.trim();
    if trimmed.starts_with(&format!("# Chapter {number}")) {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    match lines.first() {
        Some(first) if first.trim_start().starts_with('#') => {
            lines[0] = &heading;
            lines.join("\n")
        }
        _ => format!("{heading}\n\n{trimmed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, FileRecord, PagePlanEntry};
    use crate::llm::MockClient;
    use crate::pipeline::plan;

    fn planned_state(chapters: &[&str]) -> PipelineState {
        let mut state = PipelineState::new(vec![FileRecord::new("a.py", "print(1)")]);
        state.components = chapters
            .iter()
            .map(|name| Component {
                name: name.to_string(),
                description: "about it".into(),
                file_indices: vec![0],
            })
            .collect();
        state.ordering = (0..chapters.len()).collect();
        plan::run(&mut state);
        state
    }

    #[test]
    fn loop_terminates_after_exactly_planned_calls() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let mut state = planned_state(&["A", "B", "C"]);
        let mock = MockClient::with_responses(vec![
            "# Chapter 1: A\n\nbody".into(),
            "# Chapter 2: B\n\nbody".into(),
            "# Chapter 3: C\n\nbody".into(),
        ]);

        while state.has_remaining_pages() {
            process_next(&mut state, &config, &mock, &prompts).unwrap();
        }
        assert_eq!(mock.calls(), 3);
        assert_eq!(state.pages_processed, 3);
        assert_eq!(state.pages.len(), 3);
    }

    #[test]
    fn zero_planned_pages_terminates_immediately() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let mut state = planned_state(&[]);
        let mock = MockClient::with_responses(Vec::new());

        while state.has_remaining_pages() {
            process_next(&mut state, &config, &mock, &prompts).unwrap();
        }
        assert_eq!(mock.calls(), 0);
        assert_eq!(state.pages_processed, 0);
    }

    #[test]
    fn later_pages_see_earlier_ones() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let mut state = planned_state(&["A", "B"]);
        let mock = MockClient::with_responses(vec![
            "# Chapter 1: A\n\nfirst body".into(),
            "# Chapter 2: B\n\nsecond body".into(),
        ]);

        process_next(&mut state, &config, &mock, &prompts).unwrap();
        // The accumulated log now carries chapter one for the next prompt.
        assert_eq!(state.pages.joined(PAGE_SEPARATOR), "# Chapter 1: A\n\nfirst body");
        process_next(&mut state, &config, &mock, &prompts).unwrap();
        assert!(state.pages.get(1).unwrap().contains("second body"));
    }

    #[test]
    fn heading_kept_when_already_correct() {
        assert_eq!(
            ensure_heading("# Chapter 2: Cache\n\nbody", 2, "Cache"),
            "# Chapter 2: Cache\n\nbody"
        );
    }

    #[test]
    fn wrong_leading_heading_is_rewritten() {
        assert_eq!(
            ensure_heading("## Some Title\nbody", 3, "Cache"),
            "# Chapter 3: Cache\nbody"
        );
    }

    #[test]
    fn missing_heading_is_prepended() {
        assert_eq!(
            ensure_heading("just prose", 1, "Intro"),
            "# Chapter 1: Intro\n\njust prose"
        );
    }

    #[test]
    fn entry_with_missing_component_is_skipped_without_a_call() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let mut state = planned_state(&["A"]);
        state.plan.push(PagePlanEntry {
            component_index: 42,
            number: 2,
            title: "ghost".into(),
            file_name: "02_ghost.md".into(),
            prev: None,
            next: None,
        });
        let mock = MockClient::with_responses(vec!["# Chapter 1: A\n\nbody".into()]);

        while state.has_remaining_pages() {
            process_next(&mut state, &config, &mock, &prompts).unwrap();
        }
        assert_eq!(mock.calls(), 1);
        // The skipped slot still occupies a page position.
        assert_eq!(state.pages.len(), 2);
        assert_eq!(state.pages.get(1), Some(""));
        assert_eq!(state.pages_processed, 2);
    }

    #[test]
    fn skipped_entry_keeps_later_pages_aligned_with_their_plan_positions() {
        let config = RunConfig::new("demo", 5, "docs".into());
        let prompts = PromptSet::new().unwrap();
        let mut state = planned_state(&["A", "B"]);
        // Wedge a dangling entry between the two valid ones.
        state.plan.insert(
            1,
            PagePlanEntry {
                component_index: 42,
                number: 2,
                title: "ghost".into(),
                file_name: "02_ghost.md".into(),
                prev: None,
                next: None,
            },
        );
        state.plan[2].number = 3;
        let mock = MockClient::with_responses(vec![
            "# Chapter 1: A\n\nfirst".into(),
            "# Chapter 3: B\n\nlast".into(),
        ]);

        while state.has_remaining_pages() {
            process_next(&mut state, &config, &mock, &prompts).unwrap();
        }
        assert_eq!(mock.calls(), 2);
        assert_eq!(state.pages.len(), 3);
        assert!(state.pages.get(2).unwrap().contains("last"));

        let (index, chapters, skipped) = crate::pipeline::assemble::render(&state, "demo");
        assert_eq!(skipped, 1);
        assert_eq!(chapters.len(), 2);
        assert!(chapters[1].1.contains("last"));
        assert!(!index.contains("02_ghost.md"));
    }
}
