// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password strength heuristic shown on account forms.

use std::fmt;

/// Strength bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Strength::VeryWeak,
            30..=49 => Strength::Weak,
            50..=69 => Strength::Fair,
            70..=84 => Strength::Good,
            85..=94 => Strength::Strong,
            _ => Strength::VeryStrong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::VeryWeak => "Very Weak",
            Strength::Weak => "Weak",
            Strength::Fair => "Fair",
            Strength::Good => "Good",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score a password from 0 to 100.
///
/// Length earns up to 40 points (8, 12 and 16 characters), each character
/// class present (lower, upper, digit, other) earns 15.
pub fn score(password: &str) -> u8 {
    let len = password.chars().count();
    let mut score = 0u8;

    if len >= 8 {
        score += 20;
    }
    if len >= 12 {
        score += 10;
    }
    if len >= 16 {
        score += 10;
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    for present in classes {
        if present {
            score += 15;
        }
    }

    score.min(100)
}

pub fn strength(password: &str) -> Strength {
    Strength::from_score(score(password))
}
