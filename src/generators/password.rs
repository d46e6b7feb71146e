// src/generators/password.rs
use rand::{seq::SliceRandom, Rng};
use crate::models::PasswordRules;

/// How many candidates are offered when the caller does not ask for a count.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Builds passwords out of a random number of letters, symbols and digits,
/// then shuffles them so the groups do not stay in order.
#[derive(Debug, Clone, Default)]
pub struct PasswordGenerator {
    rules: PasswordRules,
}

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator::default()
    }

    /// `PasswordRules::new` has already rejected empty ranges and non-ASCII
    /// symbols, so generation cannot panic.
    pub fn with_rules(rules: PasswordRules) -> Self {
        PasswordGenerator { rules }
    }

    pub fn rules(&self) -> &PasswordRules {
        &self.rules
    }

    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let letter_count = rng.gen_range(self.rules.letter_count().clone());
        let symbol_count = rng.gen_range(self.rules.symbol_count().clone());
        let digit_count = rng.gen_range(self.rules.digit_count().clone());

        let mut chars = Vec::with_capacity(letter_count + symbol_count + digit_count);
        pick_into(&mut chars, PasswordRules::LETTERS, letter_count, rng);
        pick_into(&mut chars, self.rules.symbols(), symbol_count, rng);
        pick_into(&mut chars, PasswordRules::DIGITS, digit_count, rng);

        chars.shuffle(rng);

        chars.into_iter().map(char::from).collect()
    }

    /// Independent passwords; duplicates are not filtered out.
    pub fn generate_batch(&self, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| self.generate_with(&mut rng)).collect()
    }
}

fn pick_into<R: Rng + ?Sized>(out: &mut Vec<u8>, alphabet: &[u8], count: usize, rng: &mut R) {
    out.extend((0..count).filter_map(|_| alphabet.choose(rng).copied()));
}
