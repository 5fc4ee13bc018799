pub mod depth;
pub mod tags;

use crate::model::{CodeFlow, FlowStep, PhysicalLocation, SourcePosition, SourceRegion, StepKind};
use crate::registry::FileRegistry;

/// A trace that can be turned into a code flow, registering every file it
/// mentions along the way.
///
/// Each variant walks its items with a small state value and produces a
/// [`Transition`] per emitted item: the kind of the new step, and optionally
/// a kind to stamp onto the step emitted just before it (calls are only
/// recognized once the callee's first step shows up).
pub trait TraceSource {
    fn normalize(&self, files: &mut FileRegistry) -> CodeFlow;
}

/// Format-neutral view of one trace item that yields a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceItem<'a> {
    pub path: &'a str,
    pub position: SourcePosition,
    /// Highlighted ranges; empty when the analyzer gave none
    pub ranges: Vec<(SourcePosition, SourcePosition)>,
    pub message: &'a str,
}

impl TraceItem<'_> {
    fn locate(&self, files: &mut FileRegistry) -> PhysicalLocation {
        let uri = files.resolve(self.path);
        let region = SourceRegion::reconcile(&self.ranges)
            .unwrap_or_else(|| SourceRegion::point(self.position));
        PhysicalLocation { uri, region }
    }
}

/// Step kinds produced by one state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub current: StepKind,
    pub previous: Option<StepKind>,
}

impl Transition {
    pub fn current(kind: StepKind) -> Self {
        Transition {
            current: kind,
            previous: None,
        }
    }

    pub fn marking_previous(current: StepKind, previous: StepKind) -> Self {
        Transition {
            current,
            previous: Some(previous),
        }
    }
}

/// Accumulates steps with contiguous 1-based indices.
#[derive(Debug, Default)]
pub struct FlowBuilder {
    steps: Vec<FlowStep>,
}

impl FlowBuilder {
    /// Append one step and apply the transition. A retroactive mark with no
    /// previous step is dropped.
    pub fn apply(
        mut self,
        transition: Transition,
        item: &TraceItem<'_>,
        files: &mut FileRegistry,
    ) -> Self {
        if let (Some(kind), Some(last)) = (transition.previous, self.steps.last_mut()) {
            last.kind = kind;
        }
        let location = item.locate(files);
        self.steps.push(FlowStep {
            index: self.steps.len() + 1,
            location,
            message: item.message.to_string(),
            kind: transition.current,
        });
        self
    }

    pub fn finish(self) -> CodeFlow {
        CodeFlow { steps: self.steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(line: i64) -> TraceItem<'static> {
        TraceItem {
            path: "a.c",
            position: SourcePosition::new(line, 1),
            ranges: Vec::new(),
            message: "m",
        }
    }

    #[test]
    fn test_indices_are_contiguous() {
        let mut files = FileRegistry::new("/nonexistent-root", None);
        let flow = (1..=4)
            .fold(FlowBuilder::default(), |b, line| {
                b.apply(Transition::default(), &item(line), &mut files)
            })
            .finish();
        let indices: Vec<_> = flow.steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_previous_mark_without_previous_step_is_ignored() {
        let mut files = FileRegistry::new("/nonexistent-root", None);
        let flow = FlowBuilder::default()
            .apply(
                Transition::marking_previous(StepKind::FunctionEnter, StepKind::Call),
                &item(1),
                &mut files,
            )
            .finish();
        assert_eq!(flow.len(), 1);
        assert_eq!(flow.steps[0].kind, StepKind::FunctionEnter);
    }

    #[test]
    fn test_ranges_take_precedence_over_position() {
        let mut files = FileRegistry::new("/nonexistent-root", None);
        let mut ranged = item(9);
        ranged.ranges = vec![
            (SourcePosition::new(3, 4), SourcePosition::new(3, 8)),
            (SourcePosition::new(2, 6), SourcePosition::new(2, 9)),
        ];
        let location = ranged.locate(&mut files);
        assert_eq!(location.region.start, SourcePosition::new(2, 6));
        assert_eq!(location.region.end, Some(SourcePosition::new(3, 8)));

        let plain = item(9).locate(&mut files);
        assert_eq!(plain.region, SourceRegion::point(SourcePosition::new(9, 1)));
        assert_eq!(files.len(), 1);
    }
}
