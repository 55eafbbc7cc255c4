//! Mindmap hierarchy construction.
//!
//! Turns the flat client/project/task snapshot into the single rooted tree
//! the mindmap view draws: one synthetic root covering every client, one
//! child per project, and each project's task/subtask subtree below it.
//! Pure computation over the input slices; the caller owns fetching and
//! rendering.

use std::collections::{HashMap, HashSet};

use db::models::{client::ClientSummary, project::ProjectSummary, task::TaskSummary};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use ts_rs::TS;

/// Display label of the synthetic root grouping every client.
pub const ROOT_LABEL: &str = "全クライアント";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The parent-task graph loops back on itself. Expanding such a chain
    /// would never terminate, so the whole build is rejected.
    #[error("cyclic parent reference involving task {task_id}")]
    CycleDetected { task_id: i64 },
}

/// Node identifier: a record id for real rows, a marker for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
pub enum NodeId {
    Record(i64),
    Synthetic(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Client,
    Project,
    Task,
    Subtask,
}

/// One element of the mindmap tree. `children` is omitted (not an empty
/// list) for leaves, matching what the layout walk expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MindmapNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MindmapNode>>,
}

/// Task ids excluded from the tree, by cause. Dangling foreign keys degrade
/// to omission rather than failing the build, but the loss is reported so
/// callers can log it instead of debugging a silently missing node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct DroppedRecords {
    /// Top-level tasks whose `project_id` matches no project.
    pub missing_project: Vec<i64>,
    /// Subtasks never reached: their parent id matches no task, or an
    /// ancestor was itself dropped.
    pub unreachable: Vec<i64>,
}

impl DroppedRecords {
    pub fn is_empty(&self) -> bool {
        self.missing_project.is_empty() && self.unreachable.is_empty()
    }

    pub fn total(&self) -> usize {
        self.missing_project.len() + self.unreachable.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MindmapBuild {
    /// `None` when there are no clients: the empty-state signal.
    pub root: Option<MindmapNode>,
    pub dropped: DroppedRecords,
}

/// Build the mindmap tree from a full snapshot of the three record sets.
///
/// Children preserve input order throughout: one root child per project in
/// project order, tasks and subtasks in task order. Identical snapshots
/// produce identical trees.
pub fn build(
    clients: &[ClientSummary],
    projects: &[ProjectSummary],
    tasks: &[TaskSummary],
) -> Result<MindmapBuild, HierarchyError> {
    detect_cycles(tasks)?;

    if clients.is_empty() {
        return Ok(MindmapBuild {
            root: None,
            dropped: DroppedRecords::default(),
        });
    }

    // Partition tasks once: direct children per parent task, top tasks per
    // project.
    let mut children_by_parent: HashMap<i64, Vec<&TaskSummary>> = HashMap::new();
    let mut top_by_project: HashMap<i64, Vec<&TaskSummary>> = HashMap::new();
    for task in tasks {
        match task.parent_task_id {
            Some(parent_id) => children_by_parent.entry(parent_id).or_default().push(task),
            None => top_by_project.entry(task.project_id).or_default().push(task),
        }
    }

    let mut placed: HashSet<i64> = HashSet::with_capacity(tasks.len());

    let project_nodes: Vec<MindmapNode> = projects
        .iter()
        .map(|project| {
            let task_nodes: Vec<MindmapNode> = top_by_project
                .get(&project.id)
                .map(|tops| {
                    tops.iter()
                        .map(|task| expand_task(task, NodeKind::Task, &children_by_parent, &mut placed))
                        .collect()
                })
                .unwrap_or_default();

            MindmapNode {
                id: NodeId::Record(project.id),
                name: project.name.clone(),
                kind: NodeKind::Project,
                project_id: None,
                children: non_empty(task_nodes),
            }
        })
        .collect();

    let dropped = collect_dropped(tasks, &placed);

    let root = MindmapNode {
        id: NodeId::Synthetic("root".to_string()),
        name: ROOT_LABEL.to_string(),
        kind: NodeKind::Client,
        project_id: None,
        children: non_empty(project_nodes),
    };

    Ok(MindmapBuild {
        root: Some(root),
        dropped,
    })
}

fn non_empty(nodes: Vec<MindmapNode>) -> Option<Vec<MindmapNode>> {
    if nodes.is_empty() { None } else { Some(nodes) }
}

/// Expand one task and its subtree. Safe to recurse: `detect_cycles` has
/// already rejected any looping parent chain, so depth is bounded by the
/// input.
fn expand_task(
    task: &TaskSummary,
    kind: NodeKind,
    children_by_parent: &HashMap<i64, Vec<&TaskSummary>>,
    placed: &mut HashSet<i64>,
) -> MindmapNode {
    placed.insert(task.id);
    let children: Vec<MindmapNode> = children_by_parent
        .get(&task.id)
        .map(|subtasks| {
            subtasks
                .iter()
                .map(|sub| expand_task(sub, NodeKind::Subtask, children_by_parent, placed))
                .collect()
        })
        .unwrap_or_default();

    MindmapNode {
        id: NodeId::Record(task.id),
        name: task.name.clone(),
        kind,
        project_id: Some(task.project_id),
        children: non_empty(children),
    }
}

/// Walk every parent chain with a three-state mark so each task is visited
/// once. A chain that re-enters a task currently on the walk is a cycle.
fn detect_cycles(tasks: &[TaskSummary]) -> Result<(), HierarchyError> {
    const IN_CHAIN: u8 = 1;
    const DONE: u8 = 2;

    let parent_of: HashMap<i64, Option<i64>> =
        tasks.iter().map(|t| (t.id, t.parent_task_id)).collect();
    let mut marks: HashMap<i64, u8> = HashMap::with_capacity(tasks.len());

    for task in tasks {
        if marks.contains_key(&task.id) {
            continue;
        }
        let mut chain = Vec::new();
        let mut current = Some(task.id);
        while let Some(id) = current {
            match marks.get(&id) {
                Some(&IN_CHAIN) => return Err(HierarchyError::CycleDetected { task_id: id }),
                Some(&DONE) => break,
                _ => {}
            }
            marks.insert(id, IN_CHAIN);
            chain.push(id);
            // A parent id that matches no task ends the chain here; that is
            // a dangling reference, not a cycle.
            current = parent_of
                .get(&id)
                .copied()
                .flatten()
                .filter(|parent_id| parent_of.contains_key(parent_id));
        }
        for id in chain {
            marks.insert(id, DONE);
        }
    }
    Ok(())
}

fn collect_dropped(tasks: &[TaskSummary], placed: &HashSet<i64>) -> DroppedRecords {
    let mut dropped = DroppedRecords::default();
    for task in tasks {
        if placed.contains(&task.id) {
            continue;
        }
        match task.parent_task_id {
            None => dropped.missing_project.push(task.id),
            Some(_) => dropped.unreachable.push(task.id),
        }
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: i64, name: &str) -> ClientSummary {
        ClientSummary {
            id,
            name: name.to_string(),
        }
    }

    fn project(id: i64, client_id: i64, name: &str) -> ProjectSummary {
        ProjectSummary {
            id,
            client_id,
            name: name.to_string(),
        }
    }

    fn task(id: i64, project_id: i64, parent: Option<i64>, name: &str) -> TaskSummary {
        TaskSummary {
            id,
            project_id,
            parent_task_id: parent,
            name: name.to_string(),
        }
    }

    #[test]
    fn no_clients_yields_no_root() {
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![task(100, 10, None, "Design")];
        let build = build(&[], &projects, &tasks).unwrap();
        assert!(build.root.is_none());
    }

    #[test]
    fn root_has_one_child_per_project_in_input_order() {
        let clients = vec![client(1, "Acme"), client(2, "Beta")];
        let projects = vec![
            project(12, 2, "Zulu"),
            project(10, 1, "Alpha"),
            project(11, 1, "Mike"),
        ];
        let build = build(&clients, &projects, &[]).unwrap();
        let root = build.root.unwrap();

        assert_eq!(root.kind, NodeKind::Client);
        assert_eq!(root.name, ROOT_LABEL);
        let children = root.children.unwrap();
        let ids: Vec<&NodeId> = children.iter().map(|c| &c.id).collect();
        assert_eq!(
            ids,
            vec![
                &NodeId::Record(12),
                &NodeId::Record(10),
                &NodeId::Record(11)
            ]
        );
        // Project order follows the project list, not the client list.
        assert!(children.iter().all(|c| c.kind == NodeKind::Project));
        assert!(children.iter().all(|c| c.children.is_none()));
    }

    #[test]
    fn tasks_attach_under_project_and_parent() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, None, "Design"),
            task(101, 10, Some(100), "Wireframe"),
            task(102, 10, None, "Launch"),
        ];
        let build = build(&clients, &projects, &tasks).unwrap();
        let root = build.root.unwrap();
        let project_node = &root.children.unwrap()[0];
        let top_tasks = project_node.children.as_ref().unwrap();

        assert_eq!(top_tasks.len(), 2);
        assert_eq!(top_tasks[0].name, "Design");
        assert_eq!(top_tasks[0].kind, NodeKind::Task);
        assert_eq!(top_tasks[0].project_id, Some(10));
        assert_eq!(top_tasks[1].name, "Launch");

        let subtasks = top_tasks[0].children.as_ref().unwrap();
        assert_eq!(subtasks.len(), 1);
        assert_eq!(subtasks[0].id, NodeId::Record(101));
        assert_eq!(subtasks[0].kind, NodeKind::Subtask);
        assert!(subtasks[0].children.is_none());
        assert!(build.dropped.is_empty());
    }

    #[test]
    fn deep_chains_stay_subtasks_all_the_way_down() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, None, "Phase"),
            task(101, 10, Some(100), "Step"),
            task(102, 10, Some(101), "Substep"),
            task(103, 10, Some(102), "Detail"),
        ];
        let build = build(&clients, &projects, &tasks).unwrap();
        let root = build.root.unwrap();

        let root_children = root.children.unwrap();
        let mut node = &root_children[0].children.as_ref().unwrap()[0];
        assert_eq!(node.kind, NodeKind::Task);
        for expected in [101, 102, 103] {
            node = &node.children.as_ref().unwrap()[0];
            assert_eq!(node.id, NodeId::Record(expected));
            assert_eq!(node.kind, NodeKind::Subtask);
        }
        assert!(node.children.is_none());
    }

    #[test]
    fn task_with_unknown_project_is_dropped_and_reported() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, None, "Design"),
            task(200, 99, None, "Stray"),
            task(201, 99, Some(200), "Stray child"),
        ];
        let build = build(&clients, &projects, &tasks).unwrap();
        let root = build.root.clone().unwrap();
        let json = serde_json::to_string(&root).unwrap();
        assert!(!json.contains("Stray"));
        assert_eq!(build.dropped.missing_project, vec![200]);
        assert_eq!(build.dropped.unreachable, vec![201]);
    }

    #[test]
    fn subtask_with_unknown_parent_is_dropped_and_reported() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, None, "Design"),
            task(101, 10, Some(999), "Lost"),
        ];
        let build = build(&clients, &projects, &tasks).unwrap();
        assert_eq!(build.dropped.unreachable, vec![101]);
        assert_eq!(build.dropped.total(), 1);
    }

    #[test]
    fn identical_snapshots_build_identical_trees() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website"), project(11, 1, "App")];
        let tasks = vec![
            task(100, 10, None, "Design"),
            task(101, 10, Some(100), "Wireframe"),
            task(102, 11, None, "Spec"),
        ];
        let first = build(&clients, &projects, &tasks).unwrap();
        let second = build(&clients, &projects, &tasks).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn two_task_cycle_is_a_structural_error() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, Some(101), "A"),
            task(101, 10, Some(100), "B"),
        ];
        let err = build(&clients, &projects, &tasks).unwrap_err();
        assert!(matches!(err, HierarchyError::CycleDetected { .. }));
    }

    #[test]
    fn self_referencing_task_is_a_structural_error() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![task(100, 10, Some(100), "Ouroboros")];
        let err = build(&clients, &projects, &tasks).unwrap_err();
        assert_eq!(err, HierarchyError::CycleDetected { task_id: 100 });
    }

    #[test]
    fn example_scenario_matches_expected_shape() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let tasks = vec![
            task(100, 10, None, "Design"),
            task(101, 10, Some(100), "Wireframe"),
        ];
        let build = build(&clients, &projects, &tasks).unwrap();
        let root = build.root.unwrap();

        assert_eq!(root.name, "全クライアント");
        assert_eq!(root.kind, NodeKind::Client);
        let project_node = &root.children.as_ref().unwrap()[0];
        assert_eq!(project_node.id, NodeId::Record(10));
        assert_eq!(project_node.name, "Website");
        let design = &project_node.children.as_ref().unwrap()[0];
        assert_eq!(design.id, NodeId::Record(100));
        assert_eq!(design.kind, NodeKind::Task);
        let wireframe = &design.children.as_ref().unwrap()[0];
        assert_eq!(wireframe.id, NodeId::Record(101));
        assert_eq!(wireframe.kind, NodeKind::Subtask);
        assert!(wireframe.children.is_none());
    }

    #[test]
    fn serialized_nodes_use_the_wire_field_names() {
        let clients = vec![client(1, "Acme")];
        let projects = vec![project(10, 1, "Website")];
        let build = build(&clients, &projects, &[]).unwrap();
        let json = serde_json::to_value(build.root.unwrap()).unwrap();

        assert_eq!(json["id"], "root");
        assert_eq!(json["type"], "client");
        assert_eq!(json["children"][0]["id"], 10);
        assert_eq!(json["children"][0]["type"], "project");
        // Leaf projects omit the children key entirely.
        assert!(json["children"][0].get("children").is_none());
    }
}
