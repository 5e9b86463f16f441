//! Thompson construction of a non-deterministic automaton from a [`RegexNode`].

use std::collections::HashSet;

use super::table::{Slot, StateId, StateSet, TransitionTable};
use super::{AutomatonError, to_symbol};
use crate::regex::RegexNode;

/// A Thompson NFA.
///
/// Every state has at most one non-epsilon transition and at most two
/// epsilon transitions. There is exactly one accepting state.
#[derive(Debug, Clone)]
pub struct Nfa {
    table: TransitionTable,
    initial: StateId,
    accept: StateId,
}

impl Nfa {
    /// Compile `tree` into an NFA accepting exactly the language it denotes.
    pub fn build(tree: &RegexNode) -> Self {
        NfaBuilder::default().build(tree)
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Every state reachable from `seeds` through zero or more epsilon
    /// transitions.
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> StateSet {
        let mut closure = HashSet::new();
        let mut worklist: Vec<StateId> = seeds.into_iter().collect();
        while let Some(id) = worklist.pop() {
            if closure.insert(id) {
                worklist.extend_from_slice(self.table.row(id).targets(Slot::Epsilon));
            }
        }
        closure.into_iter().collect()
    }

    /// Consume `byte` from every state of `set`, then close over epsilon.
    pub fn step(&self, set: &StateSet, byte: u8) -> StateSet {
        let moved = set.iter().flat_map(|id| {
            let row = self.table.row(id);
            row.targets(Slot::Byte(byte))
                .iter()
                .chain(row.targets(Slot::Any))
                .copied()
        });
        self.epsilon_closure(moved)
    }

    /// Whether the whole of `input` is in the language, by direct simulation.
    pub fn accepts(&self, input: &str) -> Result<bool, AutomatonError> {
        let mut current = self.epsilon_closure([self.initial]);
        for ch in input.chars() {
            current = self.step(&current, to_symbol(ch)?);
            if current.is_empty() {
                return Ok(false);
            }
        }
        Ok(current.contains(self.accept))
    }
}

/// Owns the table, and with it the state counter, for one construction.
#[derive(Default)]
struct NfaBuilder {
    table: TransitionTable,
}

impl NfaBuilder {
    fn build(mut self, tree: &RegexNode) -> Nfa {
        let accept = self.table.add_state();
        self.table.row_mut(accept).mark_accepting();

        let initial = self.compile(tree, accept);
        self.table.row_mut(initial).mark_initial();

        Nfa {
            table: self.table,
            initial,
            accept,
        }
    }

    /// Emit states for `node` leading to `continuation`; return the entry state.
    fn compile(&mut self, node: &RegexNode, continuation: StateId) -> StateId {
        match node {
            RegexNode::Literal(byte) => self.single(Slot::Byte(*byte), continuation),
            RegexNode::Dot => self.single(Slot::Any, continuation),
            RegexNode::Concat(left, right) => {
                let right_entry = self.compile(right, continuation);
                self.compile(left, right_entry)
            }
            RegexNode::Altern(left, right) => {
                let left_entry = self.compile(left, continuation);
                let right_entry = self.compile(right, continuation);
                let entry = self.table.add_state();
                let row = self.table.row_mut(entry);
                row.add(Slot::Epsilon, left_entry);
                row.add(Slot::Epsilon, right_entry);
                entry
            }
            RegexNode::Star(child) => {
                let entry = self.table.add_state();
                let loop_exit = self.table.add_state();
                let exit = self.table.add_state();
                let child_entry = self.compile(child, loop_exit);

                // Enter the body or skip it; after each pass, repeat or leave.
                for state in [entry, loop_exit] {
                    let row = self.table.row_mut(state);
                    row.add(Slot::Epsilon, child_entry);
                    row.add(Slot::Epsilon, exit);
                }
                self.table.row_mut(exit).add(Slot::Epsilon, continuation);
                entry
            }
        }
    }

    /// `entry --slot--> next --eps--> continuation`
    fn single(&mut self, slot: Slot, continuation: StateId) -> StateId {
        let entry = self.table.add_state();
        let next = self.table.add_state();
        self.table.row_mut(next).add(Slot::Epsilon, continuation);
        self.table.row_mut(entry).add(slot, next);
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::parse;

    fn nfa(pattern: &str) -> Nfa {
        Nfa::build(&parse(pattern).unwrap())
    }

    /// Follow the only target of `slot`.
    fn follow(nfa: &Nfa, from: StateId, slot: Slot) -> StateId {
        let targets = nfa.table().row(from).targets(slot);
        assert_eq!(targets.len(), 1, "expected one {slot} target from {from}");
        targets[0]
    }

    #[test]
    fn markers_are_on_initial_and_accept() {
        let nfa = nfa("a");
        assert!(nfa.table().row(nfa.initial()).is_initial());
        assert!(nfa.table().row(nfa.accept()).is_accepting());
        let marked: Vec<_> = nfa
            .table()
            .states()
            .filter(|(_, row)| row.is_initial() || row.is_accepting())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(marked.len(), 2);
    }

    #[test]
    fn concat_chains_literals() {
        let nfa = nfa("ab");
        let mut state = nfa.initial();
        state = follow(&nfa, state, Slot::Byte(b'a'));
        state = follow(&nfa, state, Slot::Epsilon);
        state = follow(&nfa, state, Slot::Byte(b'b'));
        state = follow(&nfa, state, Slot::Epsilon);
        assert_eq!(state, nfa.accept());
    }

    #[test]
    fn concat_allocates_no_state_of_its_own() {
        assert_eq!(nfa("a").state_count(), 3);
        assert_eq!(nfa("ab").state_count(), 5);
        assert_eq!(nfa("abc").state_count(), 7);
    }

    #[test]
    fn dot_uses_any_slot() {
        let nfa = nfa(".");
        let next = follow(&nfa, nfa.initial(), Slot::Any);
        assert_eq!(follow(&nfa, next, Slot::Epsilon), nfa.accept());
        assert!(nfa.table().row(nfa.initial()).targets(Slot::Byte(b'.')).is_empty());
    }

    #[test]
    fn star_loops_back_to_body() {
        let nfa = nfa("a*");
        let entry = nfa.table().row(nfa.initial()).targets(Slot::Epsilon);
        assert_eq!(entry.len(), 2);
        let (body, exit) = (entry[0], entry[1]);

        let after = follow(&nfa, body, Slot::Byte(b'a'));
        let loop_exit = follow(&nfa, after, Slot::Epsilon);
        assert_eq!(
            nfa.table().row(loop_exit).targets(Slot::Epsilon),
            &[body, exit]
        );
        assert_eq!(follow(&nfa, exit, Slot::Epsilon), nfa.accept());
    }

    #[test]
    fn altern_branches_on_epsilon() {
        let nfa = nfa("a|b");
        let branches = nfa.table().row(nfa.initial()).targets(Slot::Epsilon);
        assert_eq!(branches.len(), 2);
        assert!(!nfa.table().row(branches[0]).targets(Slot::Byte(b'a')).is_empty());
        assert!(!nfa.table().row(branches[1]).targets(Slot::Byte(b'b')).is_empty());
    }

    #[test]
    fn thompson_shape_invariants() {
        for pattern in ["a|bc*", "(a|b)*abb", "((a.)|(.b))*x", "a**", "(coucou!(!)*)|(ab.d)"] {
            let nfa = nfa(pattern);
            for (id, row) in nfa.table().states() {
                assert!(
                    row.transitions().count() <= 1,
                    "{pattern}: state {id} has several consuming transitions"
                );
                assert!(row.transitions().all(|(_, targets)| targets.len() == 1));
                assert!(row.targets(Slot::Epsilon).len() <= 2);
            }
        }
    }

    #[test]
    fn epsilon_closure_of_star_entry() {
        let nfa = nfa("a*");
        let closure = nfa.epsilon_closure([nfa.initial()]);
        assert!(closure.contains(nfa.initial()));
        assert!(closure.contains(nfa.accept()));
        assert_eq!(closure.len(), 4);
    }

    #[test]
    fn simulation_accepts_whole_strings_only() {
        let nfa = nfa("a|bc*");
        for accepted in ["a", "b", "bc", "bccc"] {
            assert_eq!(nfa.accepts(accepted), Ok(true), "{accepted:?}");
        }
        for rejected in ["", "ab", "c", "bca"] {
            assert_eq!(nfa.accepts(rejected), Ok(false), "{rejected:?}");
        }
    }

    #[test]
    fn simulation_rejects_wide_characters() {
        assert_eq!(
            nfa("a").accepts("€"),
            Err(AutomatonError::CharacterOutOfRange('€'))
        );
    }
}
