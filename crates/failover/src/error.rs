// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use thiserror::Error;

/// Terminal failures: every candidate was tried and none worked
#[derive(Error, Debug)]
pub enum FailoverError {
    #[error("No active endpoint available: [{attempts}]")]
    NoActiveEndpoint { attempts: Attempts },

    #[error("No host available: [{attempts}]")]
    NoAvailableHost { attempts: Attempts },
}

impl FailoverError {
    pub fn attempts(&self) -> &Attempts {
        match self {
            FailoverError::NoActiveEndpoint { attempts } => attempts,
            FailoverError::NoAvailableHost { attempts } => attempts,
        }
    }
}

/// One failed probe or connect attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub candidate: String,
    pub reason: String,
}

/// Failed attempts in the order they were made
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attempts(Vec<Attempt>);

impl Attempts {
    pub(crate) fn push(&mut self, candidate: String, reason: String) {
        self.0.push(Attempt { candidate, reason });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attempt> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attempts {
    type Item = &'a Attempt;
    type IntoIter = std::slice::Iter<'a, Attempt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no candidates given");
        }
        for (i, attempt) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", attempt.candidate, attempt.reason)?;
        }
        Ok(())
    }
}
