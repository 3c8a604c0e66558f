//! Dependency scheduler
//!
//! Orders import tasks into stages. An edge `dependency -> dependent` is
//! added for every declared dependency; each kind lands on the level one
//! past the deepest of its dependencies, so every reference points to a
//! strictly lower level and kinds sharing a level never reference each
//! other.

use devav_model::EntityKind;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Task set that cannot be ordered
///
/// Always a configuration defect; raised before any stage runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// The declared dependencies form a cycle through this kind
    #[error("dependency cycle through {0}")]
    Cycle(EntityKind),

    /// A task depends on a kind no task imports
    #[error("{kind} depends on {missing}, which has no import task")]
    UnknownDependency {
        /// Dependent task
        kind: EntityKind,
        /// Kind without a task
        missing: EntityKind,
    },

    /// Two tasks import the same kind
    #[error("more than one import task for {0}")]
    DuplicateTask(EntityKind),
}

/// Ordered stages; stage `L` only depends on stages below `L`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagePlan {
    stages: Vec<Vec<EntityKind>>,
}

impl StagePlan {
    /// Stages in execution order
    #[must_use]
    pub fn stages(&self) -> &[Vec<EntityKind>] {
        &self.stages
    }

    /// Number of stages
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the plan has no stage
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Level `kind` is scheduled on
    #[must_use]
    pub fn level_of(&self, kind: EntityKind) -> Option<usize> {
        self.stages.iter().position(|stage| stage.contains(&kind))
    }

    /// Iterate `(level, kinds)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[EntityKind])> {
        self.stages
            .iter()
            .enumerate()
            .map(|(level, kinds)| (level, kinds.as_slice()))
    }
}

impl fmt::Display for StagePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, kinds) in self.iter() {
            let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
            writeln!(f, "L{level}: {}", names.join(", "))?;
        }
        Ok(())
    }
}

/// Compute the stage plan for `tasks`, given as `(kind, dependencies)`
///
/// # Errors
/// - [`ScheduleError::DuplicateTask`] if a kind appears twice
/// - [`ScheduleError::UnknownDependency`] if a dependency has no task
/// - [`ScheduleError::Cycle`] if the dependencies are cyclic
pub fn plan<'a, I>(tasks: I) -> Result<StagePlan, ScheduleError>
where
    I: IntoIterator<Item = (EntityKind, &'a [EntityKind])>,
{
    let tasks: Vec<(EntityKind, &[EntityKind])> = tasks.into_iter().collect();

    let mut graph: DiGraphMap<EntityKind, ()> = DiGraphMap::new();
    for (kind, _) in &tasks {
        if graph.contains_node(*kind) {
            return Err(ScheduleError::DuplicateTask(*kind));
        }
        graph.add_node(*kind);
    }
    for (kind, deps) in &tasks {
        for dep in *deps {
            if dep == kind {
                return Err(ScheduleError::Cycle(*kind));
            }
            if !graph.contains_node(*dep) {
                return Err(ScheduleError::UnknownDependency {
                    kind: *kind,
                    missing: *dep,
                });
            }
            graph.add_edge(*dep, *kind, ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| ScheduleError::Cycle(cycle.node_id()))?;

    let mut levels: HashMap<EntityKind, usize> = HashMap::with_capacity(order.len());
    for kind in order {
        let level = graph
            .neighbors_directed(kind, Direction::Incoming)
            .filter_map(|dep| levels.get(&dep))
            .map(|l| l + 1)
            .max()
            .unwrap_or(0);
        levels.insert(kind, level);
    }

    let mut grouped: BTreeMap<usize, Vec<EntityKind>> = BTreeMap::new();
    for (kind, level) in levels {
        grouped.entry(level).or_default().push(kind);
    }
    let stages = grouped
        .into_values()
        .map(|mut kinds| {
            kinds.sort_unstable();
            kinds
        })
        .collect();

    Ok(StagePlan { stages })
}
