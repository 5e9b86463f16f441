//! Transition tables shared by the NFA and the DFA.
//!
//! Every state owns a fixed-width [`Row`]: one slot per byte value, one `ANY`
//! slot standing for "any byte" and one `EPSILON` slot. The `INIT` and
//! `ACCEPT` markers are flags on the row.

use std::fmt;

use itertools::Itertools;

use crate::regex::ast::escape_byte;

/// Number of concrete symbols. Input symbols must be strictly below this.
pub const ALPHABET_SIZE: usize = 256;

const ANY_INDEX: usize = ALPHABET_SIZE;
const EPSILON_INDEX: usize = ALPHABET_SIZE + 1;
const SLOT_COUNT: usize = ALPHABET_SIZE + 2;

/// Identifier of a state within one [`TransitionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A column of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Byte(u8),
    Any,
    Epsilon,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Byte(byte) => byte as usize,
            Slot::Any => ANY_INDEX,
            Slot::Epsilon => EPSILON_INDEX,
        }
    }

    fn from_index(index: usize) -> Slot {
        match index {
            ANY_INDEX => Slot::Any,
            EPSILON_INDEX => Slot::Epsilon,
            _ => Slot::Byte(index as u8),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Byte(byte) => write!(f, "{}", escape_byte(*byte)),
            Slot::Any => write!(f, "ANY"),
            Slot::Epsilon => write!(f, "EPS"),
        }
    }
}

/// Outgoing transitions and markers of one state.
#[derive(Debug, Clone)]
pub struct Row {
    slots: Vec<Vec<StateId>>,
    initial: bool,
    accepting: bool,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            slots: vec![Vec::new(); SLOT_COUNT],
            initial: false,
            accepting: false,
        }
    }
}

impl Row {
    pub fn targets(&self, slot: Slot) -> &[StateId] {
        &self.slots[slot.index()]
    }

    /// The first target of `slot`. In a DFA this is the only one.
    pub fn target(&self, slot: Slot) -> Option<StateId> {
        self.targets(slot).first().copied()
    }

    /// Append `target` to `slot`.
    pub fn add(&mut self, slot: Slot, target: StateId) {
        self.slots[slot.index()].push(target);
    }

    /// Make `target` the only target of `slot`.
    pub fn set(&mut self, slot: Slot, target: StateId) {
        let targets = &mut self.slots[slot.index()];
        targets.clear();
        targets.push(target);
    }

    /// Non-empty, non-epsilon slots in column order.
    pub fn transitions(&self) -> impl Iterator<Item = (Slot, &[StateId])> + '_ {
        self.slots[..EPSILON_INDEX]
            .iter()
            .enumerate()
            .filter(|(_, targets)| !targets.is_empty())
            .map(|(index, targets)| (Slot::from_index(index), targets.as_slice()))
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn mark_initial(&mut self) {
        self.initial = true;
    }

    pub fn mark_accepting(&mut self) {
        self.accepting = true;
    }
}

/// A set of states, kept sorted and free of duplicates so that equal sets
/// compare and hash equal regardless of how they were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateSet(Vec<StateId>);

impl StateSet {
    pub fn contains(&self, id: StateId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        Self(iter.into_iter().sorted_unstable().dedup().collect())
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// States of an automaton, indexed by [`StateId`].
///
/// The table is also the id counter: [`TransitionTable::add_state`] mints the
/// next id in sequence.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rows: Vec<Row>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty state and return its id.
    pub fn add_state(&mut self) -> StateId {
        self.rows.push(Row::default());
        StateId(self.rows.len() - 1)
    }

    /// # Panics
    ///
    /// Panics if `id` was not minted by this table.
    pub fn row(&self, id: StateId) -> &Row {
        &self.rows[id.0]
    }

    pub fn row_mut(&mut self, id: StateId) -> &mut Row {
        &mut self.rows[id.0]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &Row)> + '_ {
        self.rows.iter().enumerate().map(|(index, row)| (StateId(index), row))
    }

    /// True when no state has an epsilon transition and every other slot
    /// holds at most one target.
    pub fn is_deterministic(&self) -> bool {
        self.rows.iter().all(|row| {
            row.targets(Slot::Epsilon).is_empty()
                && row.transitions().all(|(_, targets)| targets.len() == 1)
        })
    }
}

/// One line per state: `id: a -> 1, ANY -> 2, EPS -> {3, 4}, INIT, ACCEPT`.
impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, row) in self.states() {
            let transitions = row
                .transitions()
                .chain(Some((Slot::Epsilon, row.targets(Slot::Epsilon))))
                .filter(|(_, targets)| !targets.is_empty())
                .map(|(slot, targets)| match targets {
                    [single] => format!("{slot} -> {single}"),
                    _ => format!("{slot} -> {{{}}}", targets.iter().join(", ")),
                });
            let markers = [(row.initial, "INIT"), (row.accepting, "ACCEPT")]
                .into_iter()
                .filter(|(set, _)| *set)
                .map(|(_, name)| name.to_string());
            writeln!(f, "{id}: {}", transitions.chain(markers).join(", "))?;
        }
        Ok(())
    }
}
