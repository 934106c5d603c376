use super::variable::VariableId;

/// Partial map from variables to state indices, sized for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    states: Vec<Option<usize>>,
}

impl Assignment {
    /// Creates an empty assignment over `len` variables.
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![None; len],
        }
    }

    pub fn get(&self, id: VariableId) -> Option<usize> {
        self.states.get(id.index()).copied().flatten()
    }

    pub fn set(&mut self, id: VariableId, state: usize) {
        if let Some(slot) = self.states.get_mut(id.index()) {
            *slot = Some(state);
        }
    }

    pub fn clear(&mut self, id: VariableId) {
        if let Some(slot) = self.states.get_mut(id.index()) {
            *slot = None;
        }
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.get(id).is_some()
    }

    /// Number of variables the assignment can hold.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(Option::is_some)
    }

    /// First variable without a value, in id order.
    pub fn first_missing(&self) -> Option<VariableId> {
        self.states
            .iter()
            .position(Option::is_none)
            .map(VariableId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, usize)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(index, state)| state.map(|s| (VariableId::new(index), s)))
    }
}
