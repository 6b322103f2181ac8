use serde::{Deserialize, Serialize};

use crate::event_bus::RenderTrigger;

/// When drag-driven redraws happen.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedrawPolicy {
    /// One synchronous pass per pointer move.
    #[default]
    Immediate,
    /// At most one pass per animation frame, with the latest rotation.
    Coalesced,
}

impl RedrawPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(RedrawPolicy::Immediate),
            "coalesced" | "frame" => Some(RedrawPolicy::Coalesced),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RedrawDecision {
    RenderNow,
    /// Deferred; the host should schedule an animation frame.
    RequestFrame,
    /// Deferred behind an already scheduled frame.
    Coalesced,
}

#[derive(Debug, Default)]
pub struct RedrawScheduler {
    policy: RedrawPolicy,
    pending: bool,
}

impl RedrawScheduler {
    pub fn new(policy: RedrawPolicy) -> Self {
        Self {
            policy,
            pending: false,
        }
    }

    pub fn set_policy(&mut self, policy: RedrawPolicy) {
        self.policy = policy;
    }

    /// Decide what to do with a render request.
    ///
    /// Only drag passes are deferred; load and resize passes render at once
    /// and absorb any pending drag pass.
    pub fn request(&mut self, trigger: RenderTrigger) -> RedrawDecision {
        match (self.policy, trigger) {
            (RedrawPolicy::Coalesced, RenderTrigger::Drag) => {
                if self.pending {
                    RedrawDecision::Coalesced
                } else {
                    self.pending = true;
                    RedrawDecision::RequestFrame
                }
            }
            _ => {
                self.pending = false;
                RedrawDecision::RenderNow
            }
        }
    }

    /// Called from the animation frame; `true` when a deferred pass is due.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{RedrawDecision, RedrawPolicy, RedrawScheduler};
    use crate::event_bus::RenderTrigger;

    #[test]
    fn immediate_renders_every_request() {
        let mut s = RedrawScheduler::new(RedrawPolicy::Immediate);
        for _ in 0..3 {
            assert_eq!(s.request(RenderTrigger::Drag), RedrawDecision::RenderNow);
        }
        assert!(!s.take_pending());
    }

    #[test]
    fn coalesced_defers_drags_to_one_frame() {
        let mut s = RedrawScheduler::new(RedrawPolicy::Coalesced);
        assert_eq!(s.request(RenderTrigger::Drag), RedrawDecision::RequestFrame);
        assert_eq!(s.request(RenderTrigger::Drag), RedrawDecision::Coalesced);
        assert!(s.take_pending());
        assert!(!s.take_pending());
    }

    #[test]
    fn resize_absorbs_pending_drag() {
        let mut s = RedrawScheduler::new(RedrawPolicy::Coalesced);
        s.request(RenderTrigger::Drag);
        assert_eq!(s.request(RenderTrigger::Resize), RedrawDecision::RenderNow);
        assert!(!s.take_pending());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(RedrawPolicy::from_str("Coalesced"), Some(RedrawPolicy::Coalesced));
        assert_eq!(RedrawPolicy::from_str("sometimes"), None);
    }
}
