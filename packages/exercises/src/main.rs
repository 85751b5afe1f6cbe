use unchain::grammars::Grammar;

fn solve(name: &str, grammar: &Grammar) {
    println!("------------ {name}");
    println!("{}", grammar.definition());
    println!("Sigma sets:\n{}\n", grammar.sigma_sets_table());

    let result = grammar.remove_chain_rules();
    println!("Without chain rules:\n{}", result.definition());
}

fn example() {
    let g = Grammar::from_productions("S", &["S → BA", "A → C | ac", "B → b", "C → A"]);

    solve("example", &g);
}

fn task_7a() {
    let g = Grammar::from_productions(
        "S",
        &[
            "S → LA | LB",
            "L → P:= | Q:=",
            "P → i",
            "A → F",
            "Q → i",
            "B → F",
            "F → Q(i)",
        ],
    );

    solve("7 a)", &g);
}

fn task_7b() {
    let g = Grammar::from_productions(
        "S",
        &["S → AC", "A → B | AaB", "B → i", "C → D | DaC", "D → i"],
    );

    solve("7 b)", &g);
}

fn task_7c() {
    let g = Grammar::from_productions(
        "S",
        &["S → 1A | B0", "A → 1A | C", "B → B0 | C", "C → 1C0 | ε"],
    );

    solve("7 c)", &g);
}

fn task_7d() {
    let g = Grammar::from_productions("S", &["S → T+P | T", "T → T*P | P", "P → i"]);

    solve("7 d)", &g);
}

fn task_7e() {
    let g = Grammar::from_productions(
        "S",
        &["S → A | B", "A → 1A0 | 1a0", "B → 1B00 | 1b00"],
    );

    solve("7 e)", &g);
}

fn main() {
    example();
    task_7a();
    task_7b();
    task_7c();
    task_7d();
    task_7e();
}
