//! A small in-process joke book.

use rand::seq::SliceRandom;

const JOKES: &[&str] = &[
    "Why don’t scientists trust atoms? Because they make up everything!",
    "Why did the math book look sad? It had too many problems.",
    "Why did the computer sneeze? It had a bad case of the 'flu' (function)!",
];

/// Picks a joke at random.
#[derive(Debug, Clone)]
pub struct JokeBook {
    jokes: Vec<String>,
}

impl JokeBook {
    pub fn new(jokes: Vec<String>) -> Self {
        Self { jokes }
    }

    /// All jokes in the book.
    pub fn jokes(&self) -> &[String] {
        &self.jokes
    }

    /// Pick a joke using the given RNG.
    pub fn tell_with(&self, rng: &mut impl rand::Rng) -> &str {
        self.jokes
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("I'm all out of jokes.")
    }

    /// Pick a joke using the thread RNG.
    pub fn tell(&self) -> &str {
        self.tell_with(&mut rand::thread_rng())
    }
}

impl Default for JokeBook {
    fn default() -> Self {
        Self::new(JOKES.iter().map(|j| (*j).to_string()).collect())
    }
}
