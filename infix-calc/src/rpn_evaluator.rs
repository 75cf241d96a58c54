use thiserror::Error;
use tracing::{debug, trace};

use crate::builtins::{self, ArithError};
use crate::rpn_converter::Postfix;
use crate::tokenizer::{Token, TokenKind, TokenList};

/// Ways a postfix sequence can fail to reduce to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    /// More than one value was left on the stack.
    TooManyOperands { left: usize },
    /// A parenthesis without a partner made it into the postfix.
    UnmatchedParen { pos: usize },
    /// Nothing to evaluate.
    Empty,
}

impl std::fmt::Display for Malformation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Malformation::TooManyOperands { left } => {
                write!(f, "{} values left on the stack after evaluation", left)
            }
            Malformation::UnmatchedParen { pos } => {
                write!(f, "unmatched parenthesis at position {}", pos)
            }
            Malformation::Empty => write!(f, "nothing to evaluate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RpnEvaluatorError {
    #[error("malformed expression: {0}")]
    MalformedExpression(Malformation),
    #[error("missing operand for `{op}` at position {pos}")]
    StackUnderflow { op: TokenKind, pos: usize },
    #[error("division by zero at position {pos}")]
    DivisionByZero { pos: usize },
    #[error("integer overflow in `{op}` at position {pos}")]
    Overflow { op: TokenKind, pos: usize },
    #[error("unknown token `{0}` in postfix expression")]
    UnknownTokenKind(TokenKind),
}

pub struct RpnEvaluator;

impl RpnEvaluator {
    /// Evaluates `rpn` against the token arena it indexes into.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(rpn: &Postfix, tokens: &TokenList) -> Result<i64, RpnEvaluatorError> {
        use TokenKind::*;

        let mut eval_stack: Vec<i64> = Vec::with_capacity(rpn.len());

        for &index in rpn.iter() {
            let token = &tokens[index];
            match token.kind {
                Number => eval_stack.push(token.value),
                Add | Sub | Mul | Div | Pow => {
                    let underflow = RpnEvaluatorError::StackUnderflow {
                        op: token.kind,
                        pos: token.pos,
                    };
                    let a = eval_stack.pop().ok_or(underflow)?;
                    let b = eval_stack.pop().ok_or(underflow)?;
                    let result = Self::apply(token, b, a)?;
                    trace!(op = %token.kind, b, a, result, "apply");
                    eval_stack.push(result);
                }
                LParen | RParen => {
                    return Err(RpnEvaluatorError::MalformedExpression(
                        Malformation::UnmatchedParen { pos: token.pos },
                    ))
                }
                Whitespace => return Err(RpnEvaluatorError::UnknownTokenKind(token.kind)),
            }
        }

        match eval_stack.as_slice() {
            [result] => {
                debug!(result, "evaluated postfix");
                Ok(*result)
            }
            [] => Err(RpnEvaluatorError::MalformedExpression(Malformation::Empty)),
            values => Err(RpnEvaluatorError::MalformedExpression(
                Malformation::TooManyOperands { left: values.len() },
            )),
        }
    }

    /// Computes `b <op> a` for the operator `token`.
    fn apply(token: &Token, b: i64, a: i64) -> Result<i64, RpnEvaluatorError> {
        use TokenKind::*;

        let result = match token.kind {
            Add => b.checked_add(a).ok_or(ArithError::Overflow),
            Sub => b.checked_sub(a).ok_or(ArithError::Overflow),
            Mul => b.checked_mul(a).ok_or(ArithError::Overflow),
            Div => builtins::div(b, a),
            Pow => builtins::pow(b, a),
            kind => return Err(RpnEvaluatorError::UnknownTokenKind(kind)),
        };

        result.map_err(|e| match e {
            ArithError::DivisionByZero => RpnEvaluatorError::DivisionByZero { pos: token.pos },
            ArithError::Overflow => RpnEvaluatorError::Overflow {
                op: token.kind,
                pos: token.pos,
            },
        })
    }
}
