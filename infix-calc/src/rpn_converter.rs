use thiserror::Error;
use tracing::{debug, trace};

use crate::tokenizer::{TokenKind, TokenList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RPNConverterError {
    #[error("unknown token `{0}` in token stream")]
    UnknownTokenKind(TokenKind),
}

/// Token indices in reverse Polish order.
///
/// Indices point into the [`TokenList`] the postfix was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postfix(pub Vec<usize>);

impl std::ops::Deref for Postfix {
    type Target = Vec<usize>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Postfix {
    /// The order `0..len`, for token lists that are already postfix.
    pub fn source_order(len: usize) -> Self {
        Postfix((0..len).collect())
    }
}

pub struct RpnConverter;

/// Sentinel for parentheses. They are never compared against operators.
const PAREN_PRECEDENCE: u8 = 3;

impl RpnConverter {
    /// Returns the binding strength of an operator or parenthesis, `None`
    /// for every other token kind.
    pub fn precedence(kind: TokenKind) -> Option<u8> {
        use TokenKind::*;

        match kind {
            Add | Sub => Some(0),
            Mul | Div => Some(1),
            Pow => Some(2),
            LParen | RParen => Some(PAREN_PRECEDENCE),
            Number | Whitespace => None,
        }
    }

    /// Converts infix token order into postfix order using the Shunting Yard
    /// algorithm.
    ///
    /// All operators associate to the left, `**` included. After a `)` drops
    /// its matching `(`, an operator left on top of the stack is emitted
    /// straight away. Unbalanced parentheses are not rejected here; a stray
    /// `(` ends up in the output and the evaluator reports it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn convert(tokens: &TokenList) -> Result<Postfix, RPNConverterError> {
        use TokenKind::*;

        let kind_at = |i: usize| tokens[i].kind;
        let mut output = Vec::with_capacity(tokens.len());
        let mut stack: Vec<usize> = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                Number => output.push(i),
                Add | Sub | Mul | Div | Pow => {
                    let prec = Self::precedence(token.kind);
                    while let Some(&top) = stack.last() {
                        if kind_at(top) == LParen || Self::precedence(kind_at(top)) < prec {
                            break;
                        }
                        trace!(op = %kind_at(top), "pop operator");
                        output.push(top);
                        stack.pop();
                    }
                    stack.push(i);
                }
                LParen => stack.push(i),
                RParen => {
                    while let Some(&top) = stack.last() {
                        if kind_at(top) == LParen {
                            break;
                        }
                        output.push(top);
                        stack.pop();
                    }

                    if stack.last().is_some_and(|&top| kind_at(top) == LParen) {
                        stack.pop();
                    }

                    if let Some(&top) = stack.last() {
                        if kind_at(top).is_operator() {
                            trace!(op = %kind_at(top), "pop operator after group");
                            output.push(top);
                            stack.pop();
                        }
                    }
                }
                Whitespace => return Err(RPNConverterError::UnknownTokenKind(token.kind)),
            }
        }

        while let Some(top) = stack.pop() {
            output.push(top);
        }

        debug!(count = output.len(), "converted to postfix");
        Ok(Postfix(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{Token, Tokenizer};
    use pretty_assertions::assert_eq;

    fn convert(input: &str) -> Vec<usize> {
        let tokens = Tokenizer::tokenize(input).unwrap();
        RpnConverter::convert(&tokens).unwrap().0
    }

    fn rendered(input: &str) -> String {
        let tokens = Tokenizer::tokenize(input).unwrap();
        let rpn = RpnConverter::convert(&tokens).unwrap();
        crate::render(&tokens, &rpn)
    }

    #[test]
    fn test_rpn_converter() {
        // 1 + 2 * 3
        assert_eq!(convert("1 + 2 * 3"), vec![0, 2, 4, 3, 1]);
        assert_eq!(rendered("2 + 3 * 4"), "2 3 4 * +");
    }

    #[test]
    fn test_rpn_converter_parentheses_1() {
        assert_eq!(rendered("(1 + 2) * 3"), "1 2 + 3 *");
    }

    #[test]
    fn test_rpn_converter_parentheses_2() {
        assert_eq!(rendered("(3 - 1) * 2"), "3 1 - 2 *");
        assert_eq!(rendered("((1 + 2))"), "1 2 +");
    }

    #[test]
    fn test_rpn_converter_associativity() {
        assert_eq!(rendered("1 + 2 * 3 * 4"), "1 2 3 * 4 * +");
        assert_eq!(rendered("8 - 4 - 2"), "8 4 - 2 -");
        assert_eq!(rendered("8 / 4 * 2"), "8 4 / 2 *");
    }

    #[test]
    fn test_rpn_converter_associativity_3_exp() {
        assert_eq!(rendered("2 ** 3 ** 4"), "2 3 ** 4 **");
        assert_eq!(rendered("2 * 3 ** 4"), "2 3 4 ** *");
    }

    #[test]
    fn test_rpn_converter_pops_operator_after_group() {
        // `*` leaves the stack when `)` closes, before `**` is seen.
        assert_eq!(rendered("2 * (3 + 4) ** 2"), "2 3 4 + * 2 **");
        assert_eq!(rendered("1 - (2 - 3) - 4"), "1 2 3 - - 4 -");
    }

    #[test]
    fn test_rpn_converter_keeps_every_token_once() {
        let indices = convert("(1 + 2) * (3 - 4) / 5 ** 6");
        let parens = 4;
        assert_eq!(indices.len(), 15 - parens);
    }

    #[test]
    fn test_rpn_converter_unbalanced() {
        // A stray `)` is dropped, a stray `(` is flushed to the output.
        assert_eq!(rendered("1 + 2)"), "1 2 +");
        assert_eq!(rendered(")("), "(");
        assert_eq!(rendered("(1 + 2"), "1 2 + (");
    }

    #[test]
    fn test_rpn_converter_empty() {
        assert_eq!(convert(""), Vec::<usize>::new());
    }

    #[test]
    fn test_rpn_converter_rejects_whitespace_token() {
        let tokens = TokenList::from_iter([
            Token::number(1, 0),
            Token::new(TokenKind::Whitespace, 1),
        ]);
        assert_eq!(
            RpnConverter::convert(&tokens).unwrap_err(),
            RPNConverterError::UnknownTokenKind(TokenKind::Whitespace)
        );
    }

    #[test]
    fn test_precedence_table() {
        use crate::tokenizer::TokenKind::*;
        assert_eq!(RpnConverter::precedence(Add), RpnConverter::precedence(Sub));
        assert_eq!(RpnConverter::precedence(Mul), RpnConverter::precedence(Div));
        assert_eq!(RpnConverter::precedence(Add), Some(0));
        assert!(RpnConverter::precedence(Mul) > RpnConverter::precedence(Add));
        assert!(RpnConverter::precedence(Pow) > RpnConverter::precedence(Mul));
        assert_eq!(RpnConverter::precedence(Number), None);
        assert_eq!(RpnConverter::precedence(Whitespace), None);
    }
}
