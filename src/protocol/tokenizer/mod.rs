//! Tokenizer: splits a command line into a bounded list of arguments.
//!
//! Splitting is naive: every delimiter ends a token, so two consecutive
//! delimiters produce an empty token in between. Both the number of tokens
//! and the length of each token are bounded by the argument list capacity;
//! exceeding either aborts tokenization with a typed error.
use heapless::Vec;

use crate::core::{ARG_DELIMITER, MAX_ARGS, MAX_ARG_LEN};
use crate::error::TokenizeError;

/// A single argument token (never contains the delimiter).
pub type Argument<const L: usize = MAX_ARG_LEN> = Vec<u8, L>;

//==================================================================================ARGUMENT_LIST
/// Ordered tokens of one command line.
///
/// Created fresh for each line and consumed by exactly one dispatch. Holds at
/// most `N` tokens of at most `L` bytes each; index 0 is the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList<const N: usize = MAX_ARGS, const L: usize = MAX_ARG_LEN> {
    tokens: Vec<Argument<L>, N>,
}

impl<const N: usize, const L: usize> ArgumentList<N, L> {
    /// Build a list from ready-made tokens, applying the same bounds as
    /// [`tokenize`]. Tokens are taken verbatim, delimiters included.
    pub fn from_tokens(tokens: &[&str]) -> Result<Self, TokenizeError> {
        let mut list = Self::default();
        for token in tokens {
            let argument = Argument::<L>::from_slice(token.as_bytes())
                .map_err(|_| TokenizeError::ArgumentTooLong)?;
            list.tokens
                .push(argument)
                .map_err(|_| TokenizeError::TooManyArguments)?;
        }
        Ok(list)
    }

    /// Number of tokens, command name included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the list holds no token at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.tokens.get(index).map(|token| token.as_slice())
    }

    /// Command name (first token), empty when the list is empty.
    pub fn command(&self) -> &[u8] {
        self.get(0).unwrap_or_default()
    }

    /// Number of tokens following the command name.
    pub fn param_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// Iterate over every token in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.tokens.iter().map(|token| token.as_slice())
    }
}

//==================================================================================TOKENIZE
/// Split `line` on [`ARG_DELIMITER`].
pub fn tokenize<const N: usize, const L: usize>(
    line: &[u8],
) -> Result<ArgumentList<N, L>, TokenizeError> {
    tokenize_with(line, ARG_DELIMITER)
}

/// Split `line` on an arbitrary delimiter byte.
///
/// The last token (possibly empty) is always included, so a line with `k`
/// delimiters yields `k + 1` tokens.
pub fn tokenize_with<const N: usize, const L: usize>(
    line: &[u8],
    delimiter: u8,
) -> Result<ArgumentList<N, L>, TokenizeError> {
    let mut tokens: Vec<Argument<L>, N> = Vec::new();
    let mut current: Argument<L> = Vec::new();

    for &byte in line {
        if byte == delimiter {
            tokens
                .push(core::mem::take(&mut current))
                .map_err(|_| TokenizeError::TooManyArguments)?;
        } else {
            current
                .push(byte)
                .map_err(|_| TokenizeError::ArgumentTooLong)?;
        }
    }

    tokens
        .push(current)
        .map_err(|_| TokenizeError::TooManyArguments)?;

    Ok(ArgumentList { tokens })
}
