//! Natural-language arithmetic: expression extraction and restricted evaluation.
//!
//! Extraction turns "calculate 2 plus 2" into `2+2`. Evaluation runs the result
//! through an allow-list check, a tokenizer and a recursive-descent parser; the
//! only thing an expression can ever do is produce a number or an error.

pub mod lexer;
pub mod parser;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::EvalError;

pub use parser::{BinaryOp, Expr};

/// Whole-string allow-list every expression must satisfy before parsing.
static RE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.+\-*/()^\s]+$").unwrap());

/// Maximal runs of expression characters.
static RE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9.+\-*/()^\s]+").unwrap());

/// Everything outside the expression character class.
static RE_NON_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.+\-*/()^\s]").unwrap());

/// `2 x 3` style multiplication between two numbers. Consumes the right-hand
/// digit, so chains need repeated passes.
static RE_LETTER_X: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*x\s*(\d)").unwrap());

/// Operator words, longest phrases first.
static OPERATOR_WORDS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bmultiplied\s+by\b", " * "),
        (r"\bdivided\s+by\b", " / "),
        (r"\bto\s+the\s+power\s+of\b", " ^ "),
        (r"\btimes\b", " * "),
        (r"\bover\b", " / "),
        (r"\bplus\b", " + "),
        (r"\bminus\b", " - "),
    ]
    .into_iter()
    .map(|(pattern, op)| (Regex::new(pattern).unwrap(), op))
    .collect()
});

/// Lower-case the text and replace operator words and symbol variants with
/// canonical operators.
pub fn normalize_operators(text: &str) -> String {
    let mut out = text.to_lowercase().replace(['×', '✕'], "*").replace('÷', "/");
    for (re, op) in OPERATOR_WORDS.iter() {
        out = re.replace_all(&out, *op).into_owned();
    }
    loop {
        let next = RE_LETTER_X.replace_all(&out, "${1}*${2}").into_owned();
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Pull the first arithmetic expression out of an utterance.
///
/// Every character outside the expression class is dropped, so words between
/// numbers vanish rather than split the expression: "2 apples plus 3" gives
/// `2+3`. Returns the first maximal run with whitespace removed, or an empty
/// string.
pub fn extract_expression(utterance: &str) -> String {
    let normalized = normalize_operators(utterance);
    let cleaned = RE_NON_EXPR.replace_all(&normalized, "");
    RE_RUN
        .find(&cleaned)
        .map(|run| run.as_str().chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

/// Evaluate an arithmetic expression.
///
/// The string must consist entirely of digits, `.`, `+ - * / ^`, parentheses
/// and whitespace; anything else is rejected before tokenizing.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    if !RE_GRAMMAR.is_match(expression) {
        return Err(EvalError::invalid(
            expression,
            "contains characters outside the arithmetic grammar",
        ));
    }
    let tokens = lexer::tokenize(expression)?;
    let ast = parser::parse(expression, &tokens)?;
    let value = ast.eval(expression)?;
    if !value.is_finite() {
        return Err(EvalError::invalid(expression, "result is not a finite number"));
    }
    Ok(value)
}

/// Render a result the way a person would write it: `4`, `2.5`, `-0.125`.
/// Integral values from 1e15 up use scientific notation (`1e300`).
pub fn format_number(value: f64) -> String {
    if value.fract() != 0.0 {
        format!("{value}")
    } else if value.abs() < 1e15 {
        // Avoids printing "-0".
        format!("{}", value as i64)
    } else {
        format!("{value:e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_operator_words() {
        assert_eq!(extract_expression("what is 2 plus 2"), "2+2");
        assert_eq!(extract_expression("10 divided by 4"), "10/4");
        assert_eq!(extract_expression("3 multiplied by 7"), "3*7");
        assert_eq!(extract_expression("9 minus 3 times 2"), "9-3*2");
        assert_eq!(extract_expression("8 over 2"), "8/2");
    }

    #[test]
    fn extracts_symbol_variants() {
        assert_eq!(extract_expression("6 × 7"), "6*7");
        assert_eq!(extract_expression("2^10"), "2^10");
        assert_eq!(extract_expression("what's 3 x 4?"), "3*4");
    }

    #[test]
    fn extraction_ignores_punctuation_and_trailing_words() {
        assert_eq!(extract_expression("Calculate (3+4)*2, please!"), "(3+4)*2");
    }

    #[test]
    fn extraction_of_plain_text_is_empty() {
        assert_eq!(extract_expression("hello there"), "");
        assert_eq!(extract_expression(""), "");
    }

    #[test]
    fn evaluates_basic_arithmetic() {
        assert_eq!(evaluate("2+2").unwrap(), 4.0);
        assert_eq!(evaluate("2*3+4").unwrap(), 10.0);
        assert_eq!(evaluate("2*(3+4)").unwrap(), 14.0);
        assert_eq!(evaluate("7/2").unwrap(), 3.5);
        assert_eq!(evaluate("2^10").unwrap(), 1024.0);
        assert_eq!(evaluate("2**3").unwrap(), 8.0);
        assert_eq!(evaluate("-3+5").unwrap(), 2.0);
        assert_eq!(evaluate(" 1.5 * 2 ").unwrap(), 3.0);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert!(matches!(
            evaluate("2/0"),
            Err(EvalError::DivisionByZero { .. })
        ));
        assert!(matches!(
            evaluate("1/(3-3)"),
            Err(EvalError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn malformed_expressions_are_invalid() {
        for src in ["2+", "", "(", "1.2.3", "*2", "2 3", "()"] {
            assert!(
                matches!(evaluate(src), Err(EvalError::InvalidExpression { .. })),
                "{src:?} should be invalid"
            );
        }
    }

    #[test]
    fn code_is_rejected_before_parsing() {
        for src in ["import os", "__import__('os')", "2+x", "abs(-1)"] {
            let err = evaluate(src).unwrap_err();
            assert!(matches!(err, EvalError::InvalidExpression { .. }), "{src}");
        }
    }

    #[test]
    fn overflow_is_invalid() {
        assert!(matches!(
            evaluate("10^1000"),
            Err(EvalError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn words_between_numbers_are_dropped() {
        assert_eq!(extract_expression("2 apples plus 3"), "2+3");
        assert_eq!(extract_expression("add 4 and 5"), "45");
    }

    #[test]
    fn chained_letter_x_is_fully_rewritten() {
        assert_eq!(extract_expression("2 x 3 x 4"), "2*3*4");
        assert_eq!(evaluate(&extract_expression("2x3x4x5")).unwrap(), 120.0);
    }

    #[test]
    fn formats_integral_results_without_fraction() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.125), "-0.125");
    }

    #[test]
    fn huge_integral_results_use_scientific_notation() {
        assert_eq!(format_number(999_999_999_999_999.0), "999999999999999");
        assert_eq!(format_number(1e15), "1e15");
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(-2e20), "-2e20");
    }
}
