use std::cmp::Ordering;

use tracing::debug;

use super::{FlowBuilder, TraceItem, Transition};
use crate::model::{CodeFlow, StepKind};
use crate::registry::FileRegistry;

/// One entry of a depth-annotated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry<'a> {
    /// Control-edge metadata; yields no step and leaves the depth untouched
    Edge,
    Event { item: TraceItem<'a>, depth: i64 },
}

/// Call-depth state. Only emitted items advance it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthState {
    previous_depth: i64,
}

impl DepthState {
    pub fn step(self, depth: i64) -> (Transition, DepthState) {
        let transition = match depth.cmp(&self.previous_depth) {
            Ordering::Less => Transition::current(StepKind::CallReturn),
            Ordering::Greater => Transition::marking_previous(StepKind::Plain, StepKind::Call),
            Ordering::Equal => Transition::default(),
        };
        (
            transition,
            DepthState {
                previous_depth: depth,
            },
        )
    }
}

/// Normalize a path whose items carry explicit nesting depths.
pub fn normalize_by_depth<'a>(
    entries: impl IntoIterator<Item = PathEntry<'a>>,
    files: &mut FileRegistry,
) -> CodeFlow {
    let mut skipped = 0usize;
    let (builder, _) = entries.into_iter().fold(
        (FlowBuilder::default(), DepthState::default()),
        |(builder, state), entry| match entry {
            PathEntry::Edge => {
                skipped += 1;
                (builder, state)
            }
            PathEntry::Event { item, depth } => {
                let (transition, next) = state.step(depth);
                (builder.apply(transition, &item, files), next)
            }
        },
    );
    if skipped > 0 {
        debug!("Skipped {} edge entries", skipped);
    }
    builder.finish()
}
