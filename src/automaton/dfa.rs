//! Subset construction of a deterministic automaton, and the cursor that runs it.

use std::collections::{BTreeMap, HashMap, VecDeque};

use log::trace;

use super::nfa::Nfa;
use super::table::{Slot, StateId, StateSet, TransitionTable};
use super::{AutomatonError, to_symbol};

/// A DFA with a cursor.
///
/// No state has epsilon transitions and every slot holds at most one target.
#[derive(Debug, Clone)]
pub struct Dfa {
    table: TransitionTable,
    initial: StateId,
    current: StateId,
}

impl Dfa {
    /// Determinize `nfa`, building every reachable state up front.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        Determinizer::new(nfa).run()
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Consume one symbol and report whether the new state accepts.
    ///
    /// A concrete slot for the symbol wins over the `ANY` slot. With neither,
    /// the cursor stays put and [`AutomatonError::NoTransition`] is returned.
    pub fn input(&mut self, ch: char) -> Result<bool, AutomatonError> {
        let byte = to_symbol(ch)?;
        let row = self.table.row(self.current);
        let next = row
            .target(Slot::Byte(byte))
            .or_else(|| row.target(Slot::Any))
            .ok_or(AutomatonError::NoTransition)?;
        self.current = next;
        Ok(self.table.row(next).is_accepting())
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    pub fn is_accepting(&self) -> bool {
        self.table.row(self.current).is_accepting()
    }

    /// Whether the whole of `input` is in the language. Leaves the cursor reset.
    pub fn accepts(&mut self, input: &str) -> Result<bool, AutomatonError> {
        self.reset();
        let mut accepted = self.is_accepting();
        for ch in input.chars() {
            match self.input(ch) {
                Ok(accepting) => accepted = accepting,
                Err(AutomatonError::NoTransition) => {
                    accepted = false;
                    break;
                }
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }
        }
        self.reset();
        Ok(accepted)
    }
}

/// Working state of one subset construction.
struct Determinizer<'a> {
    nfa: &'a Nfa,
    /// NFA state set -> DFA state, in first-seen order.
    ids: HashMap<StateSet, StateId>,
    /// Sets minted but not yet expanded.
    worklist: VecDeque<(StateId, StateSet)>,
    table: TransitionTable,
}

impl<'a> Determinizer<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            ids: HashMap::new(),
            worklist: VecDeque::new(),
            table: TransitionTable::new(),
        }
    }

    fn run(mut self) -> Dfa {
        let start = self.nfa.epsilon_closure([self.nfa.initial()]);
        let mut initial = self.canonical_id(start);

        while let Some((id, set)) = self.worklist.pop_front() {
            for (slot, targets) in self.moves(&set) {
                let closure = self.nfa.epsilon_closure(targets);
                let target = self.canonical_id(closure);
                self.table.row_mut(id).set(slot, target);
            }

            let accepting = set.contains(self.nfa.accept());
            let contains_initial = set.contains(self.nfa.initial());
            let row = self.table.row_mut(id);
            if accepting {
                row.mark_accepting();
            }
            if contains_initial {
                row.mark_initial();
                initial = id;
            }
            trace!("DFA state {id} = NFA states {set}");
        }

        Dfa {
            table: self.table,
            initial,
            current: initial,
        }
    }

    /// The DFA state standing for `set`. Unseen sets get the next id and are
    /// queued for expansion.
    fn canonical_id(&mut self, set: StateSet) -> StateId {
        if let Some(&id) = self.ids.get(&set) {
            return id;
        }
        let id = self.table.add_state();
        self.ids.insert(set.clone(), id);
        self.worklist.push_back((id, set));
        id
    }

    /// Direct (pre-closure) targets of `set`, per slot.
    ///
    /// A byte with a slot of its own must still reach everything `.` reaches,
    /// so the `ANY` targets are folded into every concrete slot.
    fn moves(&self, set: &StateSet) -> BTreeMap<Slot, Vec<StateId>> {
        let mut moves: BTreeMap<Slot, Vec<StateId>> = BTreeMap::new();
        for id in set.iter() {
            for (slot, targets) in self.nfa.table().row(id).transitions() {
                moves.entry(slot).or_default().extend_from_slice(targets);
            }
        }
        if let Some(any) = moves.get(&Slot::Any).cloned() {
            for (slot, targets) in moves.iter_mut() {
                if matches!(slot, Slot::Byte(_)) {
                    targets.extend_from_slice(&any);
                }
            }
        }
        moves
    }
}
