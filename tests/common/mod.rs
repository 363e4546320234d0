//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;

use docent::core::{Component, ComponentSet, OrderedComponents, RelationshipAnalysis, Relationship};

/// Helper to get a docent command
pub fn docent() -> Command {
    Command::new(cargo::cargo_bin!("docent"))
}

/// Scripted segregation response: `n` components, all referencing file 0.
pub fn segregation_response(n: usize) -> String {
    let components = (0..n)
        .map(|i| Component {
            name: format!("Component {i}"),
            description: format!("What component {i} does."),
            file_indices: vec![0],
        })
        .collect();
    serde_json::to_string(&ComponentSet { components }).unwrap()
}

/// Scripted relationship response forming a chain over `n` components.
pub fn relationship_response(n: usize) -> String {
    let relationships = (1..n)
        .map(|i| Relationship {
            from: i - 1,
            to: i,
            label: "feeds into".to_string(),
        })
        .collect();
    serde_json::to_string(&RelationshipAnalysis {
        overview: "A **tiny** project used for testing.".to_string(),
        relationships,
    })
    .unwrap()
}

/// Scripted ordering response.
pub fn ordering_response(ordering: &[usize]) -> String {
    serde_json::to_string(&OrderedComponents {
        ordered_components: ordering.to_vec(),
    })
    .unwrap()
}

/// Scripted page response with a correct chapter heading.
pub fn page_response(number: usize, name: &str) -> String {
    format!("# Chapter {number}: {name}\n\nSome friendly prose about {name}.")
}

/// Full response script for a run over `n` components ordered identically.
pub fn full_script(n: usize) -> Vec<String> {
    let mut script = vec![
        segregation_response(n),
        relationship_response(n),
        ordering_response(&(0..n).collect::<Vec<_>>()),
    ];
    for i in 0..n {
        script.push(page_response(i + 1, &format!("Component {i}")));
    }
    script
}
