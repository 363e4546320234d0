//! Planning stage - expand the ordering into a page plan
//!
//! Pure, no service call. Every plan entry is keyed by its *position in
//! the ordering*: chapter numbers, file names and prev/next links all come
//! from plan positions, never from raw component indices. Also renders the
//! table of contents every page prompt shares.

use console::style;

use crate::core::{chapter_file_name, PagePlanEntry, PipelineState};

pub fn run(state: &mut PipelineState) {
    let mut entries: Vec<PagePlanEntry> = Vec::with_capacity(state.ordering.len());
    for (position, &component_index) in state.ordering.iter().enumerate() {
        let Some(component) = state.component(component_index) else {
            println!(
                "{} ordering position {position} references missing component {component_index}; skipping",
                style("⚠").yellow()
            );
            continue;
        };
        entries.push(PagePlanEntry {
            component_index,
            number: position + 1,
            title: component.name.clone(),
            file_name: chapter_file_name(position, &component.name),
            prev: None,
            next: None,
        });
    }

    // Link neighbours by plan position.
    for position in 0..entries.len() {
        entries[position].prev = position.checked_sub(1).map(|p| entries[p].as_ref());
        entries[position].next = entries.get(position + 1).map(|e| e.as_ref());
    }

    state.toc = entries
        .iter()
        .map(|e| format!("{}. [{}]({})", e.number, e.title, e.file_name))
        .collect::<Vec<_>>()
        .join("\n");
    state.plan = entries;
    state.pages_processed = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Component;

    fn state_with(names: &[&str], ordering: Vec<usize>) -> PipelineState {
        let mut state = PipelineState::new(Vec::new());
        state.components = names
            .iter()
            .map(|name| Component {
                name: name.to_string(),
                description: String::new(),
                file_indices: Vec::new(),
            })
            .collect();
        state.ordering = ordering;
        state
    }

    #[test]
    fn plan_follows_ordering_not_component_index() {
        let mut state = state_with(&["Alpha", "Beta", "Gamma"], vec![2, 0, 1]);
        run(&mut state);

        assert_eq!(state.plan.len(), 3);
        assert_eq!(state.plan[0].title, "Gamma");
        assert_eq!(state.plan[0].file_name, "01_gamma.md");
        assert_eq!(state.plan[1].title, "Alpha");
        assert_eq!(state.plan[1].file_name, "02_alpha.md");
        assert_eq!(state.plan[2].number, 3);
    }

    #[test]
    fn prev_next_link_adjacent_plan_positions() {
        let mut state = state_with(&["Alpha", "Beta", "Gamma"], vec![2, 0, 1]);
        run(&mut state);

        assert!(state.plan[0].prev.is_none());
        assert_eq!(state.plan[0].next.as_ref().unwrap().title, "Alpha");
        assert_eq!(state.plan[1].prev.as_ref().unwrap().title, "Gamma");
        assert_eq!(state.plan[1].next.as_ref().unwrap().file_name, "03_beta.md");
        assert!(state.plan[2].next.is_none());
    }

    #[test]
    fn toc_lists_every_chapter_in_order() {
        let mut state = state_with(&["Alpha", "Beta"], vec![1, 0]);
        run(&mut state);
        assert_eq!(state.toc, "1. [Beta](01_beta.md)\n2. [Alpha](02_alpha.md)");
    }

    #[test]
    fn planning_is_deterministic() {
        let mut a = state_with(&["Alpha", "Beta"], vec![1, 0]);
        let mut b = state_with(&["Alpha", "Beta"], vec![1, 0]);
        run(&mut a);
        run(&mut b);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.toc, b.toc);
    }

    #[test]
    fn missing_component_positions_are_skipped() {
        let mut state = state_with(&["Alpha"], vec![0, 7]);
        run(&mut state);
        assert_eq!(state.plan.len(), 1);
        assert_eq!(state.plan[0].title, "Alpha");
    }

    #[test]
    fn empty_ordering_plans_nothing() {
        let mut state = state_with(&[], Vec::new());
        run(&mut state);
        assert!(state.plan.is_empty());
        assert!(state.toc.is_empty());
        assert!(!state.has_remaining_pages());
    }
}
