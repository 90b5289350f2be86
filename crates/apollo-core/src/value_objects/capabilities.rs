//! Capability bitflags for role-based access control
//!
//! Each account role maps to a fixed capability set. Capabilities are never
//! persisted; they are derived from the role every time they are checked.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Capability flags granted to a role
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Read published listings, toggle relations, record views
        const READ           = 1 << 0;
        /// Create and edit event listings and their meta
        const EDIT_EVENTS    = 1 << 1;
        /// Delete event listings
        const DELETE_EVENTS  = 1 << 2;
        /// Read view statistics and dashboard widgets
        const VIEW_STATS     = 1 << 3;
        /// Site administration (counter repair)
        const MANAGE_OPTIONS = 1 << 4;

        /// Everything an editor can do
        const EDITOR = Self::READ.bits()
            | Self::EDIT_EVENTS.bits()
            | Self::VIEW_STATS.bits();

        /// Everything
        const ALL = Self::EDITOR.bits()
            | Self::DELETE_EVENTS.bits()
            | Self::MANAGE_OPTIONS.bits();
    }
}

const WIRE_NAMES: [(Capabilities, &str); 5] = [
    (Capabilities::READ, "read"),
    (Capabilities::EDIT_EVENTS, "edit_events"),
    (Capabilities::DELETE_EVENTS, "delete_events"),
    (Capabilities::VIEW_STATS, "view_stats"),
    (Capabilities::MANAGE_OPTIONS, "manage_options"),
];

impl Capabilities {
    /// Check if the set contains a required capability
    ///
    /// `MANAGE_OPTIONS` bypasses every other check.
    #[inline]
    pub fn has(&self, capability: Capabilities) -> bool {
        if self.contains(Capabilities::MANAGE_OPTIONS) {
            return true;
        }
        self.contains(capability)
    }

    /// Wire name of a single flag
    pub fn name(self) -> Option<&'static str> {
        WIRE_NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, name)| *name)
    }

    /// Wire names of the individual flags that are set
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().filter_map(Capabilities::name).collect()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::READ
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join("|"))
    }
}
