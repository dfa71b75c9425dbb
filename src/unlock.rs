//! Unlock state shared by the games, navigation and content view
//!
//! Every mutation goes through `unlock`, `set_active` or `reset`. Observers
//! poll `revision()` or drain the event queue once per frame.

use std::collections::VecDeque;

use crate::section::Section;

/// Undrained events kept; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 64;

/// Observable change to the unlock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockEvent {
    Unlocked(Section),
    Activated(Section),
    Reset,
}

/// Which sections are unlocked and which one is shown
#[derive(Debug, Clone)]
pub struct UnlockState {
    /// Bit set indexed by `Section::index`
    unlocked: u8,
    active: Section,
    /// Bumped on every observable change
    revision: u64,
    events: VecDeque<UnlockEvent>,
}

impl Default for UnlockState {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockState {
    /// Session start: only Home unlocked and active
    pub fn new() -> Self {
        Self {
            unlocked: Section::Home.bit(),
            active: Section::Home,
            revision: 0,
            events: VecDeque::new(),
        }
    }

    /// Grant access to a section and show it
    ///
    /// Adding an already unlocked section leaves the set alone but still
    /// makes it active.
    pub fn unlock(&mut self, section: Section) {
        let newly_unlocked = !self.is_unlocked(section);
        if newly_unlocked {
            self.unlocked |= section.bit();
            self.record(UnlockEvent::Unlocked(section));
            log::info!("Unlocked {}", section);
        }

        let activated = self.active != section;
        if activated {
            self.active = section;
            self.record(UnlockEvent::Activated(section));
        }

        if newly_unlocked || activated {
            self.revision += 1;
        }
    }

    /// Show an already unlocked section. Returns false (and does nothing)
    /// for locked sections.
    pub fn set_active(&mut self, section: Section) -> bool {
        if !self.is_unlocked(section) {
            return false;
        }
        if self.active != section {
            self.active = section;
            self.record(UnlockEvent::Activated(section));
            self.revision += 1;
        }
        true
    }

    /// Back to the session-start state
    pub fn reset(&mut self) {
        self.unlocked = Section::Home.bit();
        self.active = Section::Home;
        self.record(UnlockEvent::Reset);
        self.revision += 1;
        log::info!("Unlock state reset");
    }

    #[inline]
    pub fn is_unlocked(&self, section: Section) -> bool {
        self.unlocked & section.bit() != 0
    }

    #[inline]
    pub fn active(&self) -> Section {
        self.active
    }

    /// Unlocked sections in ordinal order
    pub fn unlocked(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL.into_iter().filter(|s| self.is_unlocked(*s))
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.count_ones() as usize
    }

    /// True when nothing beyond Home has been unlocked
    pub fn is_initial(&self) -> bool {
        self.unlocked == Section::Home.bit()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<UnlockEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: UnlockEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = UnlockState::new();
        assert!(state.is_initial());
        assert_eq!(state.active(), Section::Home);
        assert_eq!(state.unlocked().collect::<Vec<_>>(), vec![Section::Home]);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn test_unlock_activates() {
        let mut state = UnlockState::new();
        state.unlock(Section::Skills);
        assert!(state.is_unlocked(Section::Skills));
        assert_eq!(state.active(), Section::Skills);
        assert_eq!(
            state.drain_events(),
            vec![
                UnlockEvent::Unlocked(Section::Skills),
                UnlockEvent::Activated(Section::Skills)
            ]
        );
    }

    #[test]
    fn test_unlock_is_idempotent_for_membership() {
        let mut state = UnlockState::new();
        state.unlock(Section::About);
        state.unlock(Section::Contact);
        let rev = state.revision();
        state.drain_events();

        // Re-unlocking only moves the active section
        state.unlock(Section::About);
        assert_eq!(state.unlocked_count(), 3);
        assert_eq!(state.active(), Section::About);
        assert_eq!(state.drain_events(), vec![UnlockEvent::Activated(Section::About)]);
        assert_eq!(state.revision(), rev + 1);

        // Nothing to change at all
        state.unlock(Section::About);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.revision(), rev + 1);
    }

    #[test]
    fn test_set_active_requires_unlock() {
        let mut state = UnlockState::new();
        assert!(!state.set_active(Section::Projects));
        assert_eq!(state.active(), Section::Home);

        state.unlock(Section::Projects);
        assert!(state.set_active(Section::Home));
        assert_eq!(state.active(), Section::Home);
        assert!(state.set_active(Section::Projects));
        assert_eq!(state.active(), Section::Projects);
    }

    #[test]
    fn test_reset() {
        let mut state = UnlockState::new();
        for section in Section::LOCKABLE {
            state.unlock(section);
        }
        let rev = state.revision();
        state.reset();
        assert!(state.is_initial());
        assert_eq!(state.active(), Section::Home);
        assert!(state.is_unlocked(Section::Home));
        assert!(state.revision() > rev);
        assert_eq!(state.drain_events().last(), Some(&UnlockEvent::Reset));
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = UnlockState::new();
        for _ in 0..MAX_PENDING_EVENTS {
            state.unlock(Section::About);
            state.set_active(Section::Home);
        }
        state.reset();

        let events = state.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events.last(), Some(&UnlockEvent::Reset));
        // The oldest entries (including the first Unlocked) were dropped
        assert!(!events.contains(&UnlockEvent::Unlocked(Section::About)));
        assert!(state.drain_events().is_empty());
    }
}
