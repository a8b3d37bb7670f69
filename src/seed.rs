//! Built-in dataset written on first run.

use crate::task::{Task, TaskStatus};

const SEED: &[(u64, &str, &str, TaskStatus, &str)] = &[
    (
        1,
        "Launch Epic Career",
        "Create a killer Resume, practice interview skills and apply for jobs",
        TaskStatus::Todo,
        "Launch Career",
    ),
    (
        2,
        "Conquer React",
        "Build three projects with hooks and context",
        TaskStatus::Doing,
        "Launch Career",
    ),
    (
        3,
        "Understand Databases",
        "Model a schema, write queries, tune an index",
        TaskStatus::Todo,
        "Launch Career",
    ),
    (
        4,
        "Crush Frameworks",
        "Compare routing and state management across two frameworks",
        TaskStatus::Done,
        "Launch Career",
    ),
    (
        5,
        "Plan Product Launch",
        "Draft the launch checklist and owners",
        TaskStatus::Todo,
        "Roadmap",
    ),
    (
        6,
        "Research Competitors",
        "Summarize pricing and positioning of the top five",
        TaskStatus::Doing,
        "Roadmap",
    ),
    (
        7,
        "Set Quarterly Goals",
        "Agree on three measurable outcomes",
        TaskStatus::Done,
        "Roadmap",
    ),
];

pub fn initial_tasks() -> Vec<Task> {
    SEED.iter()
        .map(|&(id, title, description, status, board)| Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            status,
            board: board.to_string(),
        })
        .collect()
}
