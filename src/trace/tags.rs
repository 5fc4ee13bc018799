use super::{FlowBuilder, TraceItem, Transition};
use crate::model::{CodeFlow, StepKind};
use crate::registry::FileRegistry;

/// Procedure-boundary tags that drive step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ProcedureStart,
    ProcedureEnd,
    Branch,
}

impl NodeKind {
    /// Only `kind` tags with a known value count; everything else is
    /// ignored so the step stays plain.
    pub fn from_tag(tag: &str, value: &str) -> Option<Self> {
        if tag != "kind" {
            return None;
        }
        match value {
            "procedure_start" => Some(NodeKind::ProcedureStart),
            "procedure_end" => Some(NodeKind::ProcedureEnd),
            "branch" => Some(NodeKind::Branch),
            _ => None,
        }
    }
}

/// Carries the "next step is a call return" flag between items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagState {
    pending_call_return: bool,
}

impl TagState {
    /// The pending return is applied first, then the item's own tags in
    /// order; the flag is consumed by every item.
    pub fn step(self, kinds: &[NodeKind]) -> (Transition, TagState) {
        let mut transition = Transition::default();
        if self.pending_call_return {
            transition.current = StepKind::CallReturn;
        }

        let mut pending_call_return = false;
        for kind in kinds {
            match kind {
                NodeKind::ProcedureEnd => {
                    transition.current = StepKind::FunctionExit;
                    pending_call_return = true;
                }
                NodeKind::ProcedureStart => {
                    transition.current = StepKind::FunctionEnter;
                    transition.previous = Some(StepKind::Call);
                }
                NodeKind::Branch => transition.current = StepKind::Branch,
            }
        }

        (transition, TagState { pending_call_return })
    }
}

/// Normalize a trace whose items carry procedure-boundary tags.
pub fn normalize_by_tags<'a>(
    items: impl IntoIterator<Item = (TraceItem<'a>, Vec<NodeKind>)>,
    files: &mut FileRegistry,
) -> CodeFlow {
    let (builder, _) = items.into_iter().fold(
        (FlowBuilder::default(), TagState::default()),
        |(builder, state), (item, kinds)| {
            let (transition, next) = state.step(&kinds);
            (builder.apply(transition, &item, files), next)
        },
    );
    builder.finish()
}
