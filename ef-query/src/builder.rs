use crate::operators::{self, OperatorKind};
use crate::predicate::FilterSet;
use crate::tokenizer::RawOperator;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Policy for `key:value` tokens whose key is not a recognized operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOperators {
    /// Keep them in the raw operator list only; no filter, no free text.
    /// This is the legacy behavior and the default.
    #[default]
    Ignore,
    /// Restore the whole `key:value` token into the free-text terms.
    FreeText,
}

/// Turns a tokenized operator sequence into a [`FilterSet`] plus extra
/// free-text terms (`body:`/`text:` values). Holds the reference instant
/// consulted by the relative-date operators so that building is a pure
/// function of its inputs.
pub struct FilterBuilder {
    now: DateTime<Utc>,
    unknown_operators: UnknownOperators,
}

pub(crate) struct BuildState {
    pub(crate) filters: FilterSet,
    pub(crate) free_text: Vec<String>,
    pub(crate) now: DateTime<Utc>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Pin the instant used by `older:`/`newer:`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            unknown_operators: UnknownOperators::default(),
        }
    }

    pub fn unknown_operators(mut self, policy: UnknownOperators) -> Self {
        self.unknown_operators = policy;
        self
    }

    /// A malformed operator value drops that one operator and the rest of
    /// the sequence continues to build; nothing here returns an error.
    pub fn build(&self, operators: &[RawOperator]) -> (FilterSet, Vec<String>) {
        let mut state = BuildState {
            filters: FilterSet::new(),
            free_text: Vec::new(),
            now: self.now,
        };
        for op in operators {
            match OperatorKind::from_str(&op.key) {
                Ok(kind) => kind.apply(&op.value, &mut state),
                Err(_) => self.on_unknown(op, &mut state),
            }
        }
        (state.filters, state.free_text)
    }

    fn on_unknown(&self, op: &RawOperator, state: &mut BuildState) {
        match self.unknown_operators {
            UnknownOperators::Ignore => match operators::suggest(&op.key) {
                Some(suggestion) => log::debug!(
                    "Ignoring unknown operator {}:{} (closest known: {}:)",
                    op.key,
                    op.value,
                    suggestion
                ),
                None => log::debug!("Ignoring unknown operator {}:{}", op.key, op.value),
            },
            UnknownOperators::FreeText => {
                state.free_text.push(format!("{}:{}", op.key, op.value));
            }
        }
    }
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
