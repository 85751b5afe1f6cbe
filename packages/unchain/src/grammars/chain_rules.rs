use indexmap::IndexSet;
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    grammars::types::{Chain, Grammar, Rule},
    language::Symbol,
};

impl Grammar {
    /// A chain rule rewrites a non-terminal into exactly one non-terminal.
    pub fn is_chain_rule(&self, rule: &Rule) -> bool {
        rule.rhs.len() == 1
            && rule
                .rhs
                .first()
                .is_some_and(|symbol| self.non_terminals.contains(symbol))
    }

    /// σ(A) = {B ∈ V_N | A ⇒* B using only chain rules}, including A itself.
    ///
    /// Computed as a fixed point: a pass over P adds the targets of chain
    /// rules whose left-hand side is already in the set, and the set is
    /// complete once a full pass adds nothing.
    pub fn sigma_set(&self, a: &Symbol) -> IndexSet<Symbol> {
        assert!(
            self.non_terminals.contains(a),
            "sigma sets are only defined for non-terminals, got {a}"
        );

        let mut set = IndexSet::from([a.clone()]);

        loop {
            let mut added = 0;

            for rule in &self.productions {
                if !set.contains(&rule.lhs) {
                    continue;
                }
                let target = match rule.rhs.first() {
                    Some(symbol) if rule.rhs.len() == 1 => symbol,
                    _ => continue,
                };
                if !self.non_terminals.contains(target) {
                    continue;
                }
                if target == &rule.lhs || set.contains(target) {
                    continue;
                }

                set.insert(target.clone());
                added += 1;
            }

            if added == 0 {
                break;
            }
        }

        set
    }

    /// Returns an equivalent grammar without chain rules.
    ///
    /// Every direct chain rule `A → s` with `s ∈ σ(A)` is dropped, and every
    /// non-chain rule `A → γ` is copied to each non-terminal whose sigma-set
    /// contains `A`, which makes the dropped chain derivations redundant.
    /// Synthesized rules are appended after the surviving originals;
    /// duplicates are kept.
    pub fn remove_chain_rules(&self) -> Grammar {
        let sigma_sets = self
            .non_terminals
            .iter()
            .map(|nt| self.sigma_set(nt))
            .collect::<Vec<_>>();

        let mut rules_to_skip = Vec::new();
        let mut rules_to_add = Vec::new();

        for (i, lhs) in self.non_terminals.iter().enumerate() {
            for symbol in &sigma_sets[i] {
                if symbol != lhs {
                    rules_to_skip.push(Rule::new(lhs.clone(), Chain::from(symbol.clone())));
                }
            }

            let derived_from = self
                .non_terminals
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i && sigma_sets[j].contains(lhs))
                .map(|(_, nt)| nt)
                .collect::<Vec<_>>();

            for rule in self.productions.iter().filter(|rule| rule.lhs == *lhs) {
                if self.is_chain_rule(rule) {
                    continue;
                }
                for nt in &derived_from {
                    rules_to_add.push(Rule::new((*nt).clone(), rule.rhs.clone()));
                }
            }
        }

        let mut productions = self
            .productions
            .iter()
            .filter(|rule| !rules_to_skip.contains(*rule))
            .cloned()
            .collect::<Vec<_>>();
        productions.extend(rules_to_add);

        Grammar {
            terminals: self.terminals.clone(),
            non_terminals: self.non_terminals.clone(),
            productions,
            start_symbol: self.start_symbol.clone(),
        }
    }

    /// Renders every non-terminal's sigma-set as a table.
    pub fn sigma_sets_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["A", "σ(A)"]);

        for nt in &self.non_terminals {
            builder.push_record([
                nt.to_string(),
                format!("{{{}}}", self.sigma_set(nt).iter().join(", ")),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        table.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s)
    }

    fn rule(lhs: &str, rhs: &str) -> Rule {
        Rule::new(
            sym(lhs),
            Chain::new(rhs.chars().map(Symbol::new).collect::<Vec<_>>()),
        )
    }

    /// S → AC, A → B | AaB, B → i, C → D | DaC, D → i
    fn assignment_grammar() -> Grammar {
        Grammar::from_productions(
            "S",
            &["S → AC", "A → B | AaB", "B → i", "C → D | DaC", "D → i"],
        )
    }

    /// A → B, B → C, C → A plus the terminal rule A → a.
    fn cycle_grammar() -> Grammar {
        Grammar::from_productions("A", &["A → B | a", "B → C", "C → A"])
    }

    #[test]
    fn sigma_set_contains_the_queried_non_terminal() {
        let g = assignment_grammar();

        for nt in g.non_terminals() {
            assert!(g.sigma_set(nt).contains(nt));
        }
    }

    #[test]
    fn sigma_sets_of_the_assignment_grammar() {
        let g = assignment_grammar();

        assert_eq!(g.sigma_set(&sym("S")), IndexSet::from([sym("S")]));
        assert_eq!(g.sigma_set(&sym("A")), IndexSet::from([sym("A"), sym("B")]));
        assert_eq!(g.sigma_set(&sym("B")), IndexSet::from([sym("B")]));
        assert_eq!(g.sigma_set(&sym("C")), IndexSet::from([sym("C"), sym("D")]));
        assert_eq!(g.sigma_set(&sym("D")), IndexSet::from([sym("D")]));
    }

    #[test]
    fn sigma_sets_of_a_chain_cycle() {
        let g = cycle_grammar();
        let all = IndexSet::from([sym("A"), sym("B"), sym("C")]);

        for nt in g.non_terminals() {
            assert_eq!(g.sigma_set(nt), all);
        }
    }

    #[test]
    fn sigma_set_is_a_fixed_point() {
        for g in [assignment_grammar(), cycle_grammar()] {
            for nt in g.non_terminals() {
                let set = g.sigma_set(nt);
                for rule in g.productions() {
                    if set.contains(&rule.lhs) && g.is_chain_rule(rule) {
                        assert!(set.contains(rule.rhs.first().unwrap()));
                    }
                }
            }
        }
    }

    #[test]
    fn sigma_set_covers_direct_chain_edges() {
        for g in [assignment_grammar(), cycle_grammar()] {
            for rule in g.productions() {
                if g.is_chain_rule(rule) {
                    assert!(g.sigma_set(&rule.lhs).contains(rule.rhs.first().unwrap()));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "only defined for non-terminals")]
    fn sigma_set_rejects_unknown_symbols() {
        assignment_grammar().sigma_set(&sym("Z"));
    }

    #[test]
    fn removes_chain_rules_from_the_assignment_grammar() {
        let g2 = assignment_grammar().remove_chain_rules();

        assert_eq!(
            g2.productions(),
            vec![
                rule("S", "AC"),
                rule("A", "AaB"),
                rule("B", "i"),
                rule("C", "DaC"),
                rule("D", "i"),
                rule("A", "i"),
                rule("C", "i"),
            ]
        );
    }

    #[test]
    fn unrolls_a_chain_cycle() {
        let g2 = cycle_grammar().remove_chain_rules();

        assert_eq!(
            g2.productions(),
            vec![rule("A", "a"), rule("B", "a"), rule("C", "a")]
        );
    }

    #[test]
    fn result_contains_no_chain_rules() {
        for g in [assignment_grammar(), cycle_grammar()] {
            let g2 = g.remove_chain_rules();
            for rule in g2.productions() {
                assert!(!g2.is_chain_rule(rule), "{rule} is a chain rule");
            }
        }
    }

    #[test]
    fn keeps_the_vocabularies_and_start_symbol() {
        let g = assignment_grammar();
        let g2 = g.remove_chain_rules();

        assert_eq!(g2.terminals(), g.terminals());
        assert_eq!(g2.non_terminals(), g.non_terminals());
        assert_eq!(g2.start_symbol(), g.start_symbol());
    }

    #[test]
    fn elimination_is_idempotent() {
        for g in [assignment_grammar(), cycle_grammar()] {
            let g2 = g.remove_chain_rules();
            let g3 = g2.remove_chain_rules();

            assert_eq!(g3.productions(), g2.productions());
        }
    }

    #[test]
    fn synthesized_duplicates_are_kept() {
        let g = Grammar::from_productions("A", &["A → B | C", "B → i", "C → i"]);
        let g2 = g.remove_chain_rules();

        assert_eq!(
            g2.productions(),
            vec![rule("B", "i"), rule("C", "i"), rule("A", "i"), rule("A", "i")]
        );
    }
}
