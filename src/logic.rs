use itertools::Itertools;
use varisat::Lit;

/// No two of `lits` are true; (!A + !B) * (!A + !C) * ...
pub(crate) fn at_most_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    lits.iter()
        .tuple_combinations()
        .map(|(a, b)| vec![!*a, !*b])
        .collect_vec()
}

/// Exactly one of `lits` is true.
pub(crate) fn exactly_one(lits: Vec<Lit>) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    clauses.extend(at_most_one(&lits));
    // at least one is true; A + B + C + ...
    clauses.push(lits);

    clauses
}

/// `premise` => (`a` <=> `b`).
///
/// X => Y*Z + !Y*!Z
/// = X => (Y + !Z) * (!Y + Z)
/// = (!X + Y + !Z) * (!X + !Y + Z)
pub(crate) fn implies_equal(premise: Lit, a: Lit, b: Lit) -> [Vec<Lit>; 2] {
    [
        vec![!premise, a, !b],
        vec![!premise, !a, b],
    ]
}
