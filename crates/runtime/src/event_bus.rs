/// What caused a render pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderTrigger {
    InitialLoad,
    Drag,
    Resize,
    AnimationFrame,
}

impl RenderTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderTrigger::InitialLoad => "initial-load",
            RenderTrigger::Drag => "drag",
            RenderTrigger::Resize => "resize",
            RenderTrigger::AnimationFrame => "animation-frame",
        }
    }
}

/// One completed render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEvent {
    /// 0-based pass number over the widget's lifetime.
    pub sequence: u64,
    pub trigger: RenderTrigger,
    pub paths: usize,
}

/// Trace of render passes, drained by whoever is interested.
#[derive(Debug, Default)]
pub struct EventBus {
    next_sequence: u64,
    events: Vec<RenderEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, trigger: RenderTrigger, paths: usize) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(RenderEvent {
            sequence,
            trigger,
            paths,
        });
        sequence
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }
}
