//! Integer arithmetic expression evaluator.
//!
//! An expression goes through three stages: [`tokenizer`] turns the input
//! into a [`TokenList`], [`rpn_converter`] reorders it into a [`Postfix`]
//! index sequence, and [`rpn_evaluator`] reduces that to a single `i64`.

pub mod builtins;
pub mod ffi;
pub mod rpn_converter;
pub mod rpn_evaluator;
pub mod tokenizer;

use std::sync::Once;

use thiserror::Error;

pub use rpn_converter::{Postfix, RPNConverterError, RpnConverter};
pub use rpn_evaluator::{Malformation, RpnEvaluator, RpnEvaluatorError};
pub use tokenizer::{Token, TokenKind, TokenList, Tokenizer, TokenizerError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: {program} <expr>")]
    Usage { program: String },
    #[error(transparent)]
    Tokenize(#[from] TokenizerError),
    #[error(transparent)]
    Convert(#[from] RPNConverterError),
    #[error(transparent)]
    Evaluate(#[from] RpnEvaluatorError),
}

/// Everything produced while evaluating one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub tokens: TokenList,
    pub postfix: Postfix,
    pub result: i64,
}

impl Evaluation {
    /// The tokens in source order, e.g. `( 2 + 3 ) * 4`.
    pub fn tokens_line(&self) -> String {
        render(&self.tokens, &Postfix::source_order(self.tokens.len()))
    }

    /// The tokens in postfix order, e.g. `2 3 + 4 *`.
    pub fn rpn_line(&self) -> String {
        render(&self.tokens, &self.postfix)
    }
}

/// Renders the tokens picked by `order`, separated by single spaces.
pub fn render(tokens: &TokenList, order: &[usize]) -> String {
    order
        .iter()
        .map(|&i| tokens[i].to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs the whole pipeline on an infix expression.
pub fn calculate(input: &str) -> Result<Evaluation, Error> {
    let tokens = Tokenizer::tokenize(input)?;
    let postfix = RpnConverter::convert(&tokens)?;
    let result = RpnEvaluator::evaluate(&postfix, &tokens)?;

    Ok(Evaluation {
        tokens,
        postfix,
        result,
    })
}

/// Evaluates an infix expression.
pub fn evaluate(input: &str) -> Result<i64, Error> {
    calculate(input).map(|evaluation| evaluation.result)
}

/// Evaluates an expression that is already in postfix form, such as the
/// output of [`Evaluation::rpn_line`].
pub fn evaluate_postfix(input: &str) -> Result<i64, Error> {
    let tokens = Tokenizer::tokenize(input)?;
    let postfix = Postfix::source_order(tokens.len());
    Ok(RpnEvaluator::evaluate(&postfix, &tokens)?)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=infix_calc=trace`. Logs go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
