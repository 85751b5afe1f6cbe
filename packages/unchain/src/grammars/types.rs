use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::language::{Symbol, EPSILON};

/// A production's right-hand side: an ordered sequence of symbols.
/// The empty chain displays as ε.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Chain(pub Vec<Symbol>);

impl Chain {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Chain(symbols.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Symbol> {
        self.0.last()
    }
}

impl From<Symbol> for Chain {
    fn from(symbol: Symbol) -> Self {
        Chain(vec![symbol])
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{EPSILON}");
        }

        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: Chain,
}

impl Rule {
    pub fn new(lhs: Symbol, rhs: impl Into<Chain>) -> Self {
        Rule {
            lhs,
            rhs: rhs.into(),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.lhs, self.rhs)
    }
}

/// A context-free grammar G = (V_N, V_T, P, S). The production sequence
/// keeps its construction order and may contain duplicates.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(super) terminals: IndexSet<Symbol>,
    pub(super) non_terminals: IndexSet<Symbol>,
    pub(super) productions: Vec<Rule>,
    pub(super) start_symbol: Symbol,
}

impl Grammar {
    pub fn new(
        terminals: impl IntoIterator<Item = Symbol>,
        non_terminals: impl IntoIterator<Item = Symbol>,
        productions: impl IntoIterator<Item = Rule>,
        start_symbol: Symbol,
    ) -> Self {
        let terminals = terminals.into_iter().collect::<IndexSet<_>>();
        let non_terminals = non_terminals.into_iter().collect::<IndexSet<_>>();
        let productions = productions.into_iter().collect::<Vec<_>>();

        assert!(
            terminals.is_disjoint(&non_terminals),
            "terminal and non-terminal vocabularies must be disjoint"
        );
        assert!(
            non_terminals.contains(&start_symbol),
            "start symbol {start_symbol} must be a non-terminal"
        );
        for rule in &productions {
            assert!(
                non_terminals.contains(&rule.lhs),
                "left-hand side of {rule} must be a non-terminal"
            );
            for symbol in &rule.rhs.0 {
                assert!(
                    terminals.contains(symbol) || non_terminals.contains(symbol),
                    "symbol {symbol} of {rule} is not part of the vocabulary"
                );
            }
        }

        Grammar {
            terminals,
            non_terminals,
            productions,
            start_symbol,
        }
    }

    /// Builds a grammar from productions like `"S → AC | AaB"`. Every symbol
    /// is a single character; ASCII uppercase characters are non-terminals,
    /// everything else is a terminal, ε is the empty chain. The vocabularies
    /// are inferred in order of appearance, start symbol first.
    pub fn from_productions<S: AsRef<str>>(start_symbol: S, productions: &[impl AsRef<str>]) -> Self {
        let start_symbol = Symbol::new(start_symbol.as_ref());

        let mut terminals = IndexSet::new();
        let mut non_terminals = IndexSet::from([start_symbol.clone()]);
        let mut rules = Vec::new();

        let mut classify = |c: char| {
            let symbol = Symbol::new(c);
            if c.is_ascii_uppercase() {
                non_terminals.insert(symbol.clone());
            } else {
                terminals.insert(symbol.clone());
            }

            symbol
        };

        for production in productions {
            let parts = production
                .as_ref()
                .split('→')
                .map(str::trim)
                .collect::<Vec<_>>();
            if parts.len() != 2 {
                panic!("Invalid production format: {}", production.as_ref());
            }

            let mut lhs_chars = parts[0].chars();
            let lhs = match (lhs_chars.next(), lhs_chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => classify(c),
                _ => panic!(
                    "Left-hand side of {} must be a single non-terminal",
                    production.as_ref()
                ),
            };

            for alternative in parts[1].split('|') {
                let alternative = alternative.trim();
                let rhs = if alternative == EPSILON {
                    Chain::default()
                } else {
                    Chain::new(alternative.chars().map(&mut classify).collect::<Vec<_>>())
                };

                rules.push(Rule::new(lhs.clone(), rhs));
            }
        }

        Grammar::new(terminals, non_terminals, rules, start_symbol)
    }

    pub fn terminals(&self) -> &IndexSet<Symbol> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &IndexSet<Symbol> {
        &self.non_terminals
    }

    pub fn productions(&self) -> &[Rule] {
        &self.productions
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    pub fn definition(&self) -> String {
        let mut grouped: IndexMap<&Symbol, Vec<String>> = IndexMap::new();
        for rule in &self.productions {
            grouped
                .entry(&rule.lhs)
                .or_default()
                .push(rule.rhs.to_string());
        }

        let mut non_terminals = self.non_terminals.clone();
        non_terminals.sort_by(|a, b| {
            if a == &self.start_symbol {
                return std::cmp::Ordering::Less;
            }
            if b == &self.start_symbol {
                return std::cmp::Ordering::Greater;
            }
            a.cmp(b)
        });

        let mut terminals = self.terminals.clone();
        terminals.sort();

        grouped.sort_by(|lhs1, _, lhs2, _| lhs1.cmp(lhs2));

        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            non_terminals.iter().join(", "),
            terminals.iter().join(", "),
            self.start_symbol
        );

        definition += "P = {\n";

        for (lhs, alternatives) in grouped {
            definition += &format!("  {} → {}\n", lhs, alternatives.join(" | "));
        }

        definition += "}\n";

        definition
    }
}
