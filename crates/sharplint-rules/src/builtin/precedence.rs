//! SA1407 and SA1408: expressions must declare precedence
//!
//! An arithmetic binary expression used as an operand of an arithmetic
//! expression with a different precedence level must be parenthesized
//! (`a + b * c` becomes `a + (b * c)`). The same holds for `&&` and `||`
//! mixed in one conditional expression.
//!
//! Both rules share one fix that wraps the operand in parentheses. The fix
//! is single-fix-only: neighbouring wraps computed on the same tree version
//! can merge delimiters incorrectly.

use sharplint_core::context::TokenContext;
use sharplint_core::cst::{CsSyntaxKind, CsSyntaxNode, edit};
use sharplint_core::{
    Fix, FixCapability, Fixer, Rule, RuleCategory, RuleMetadata, Severity, Violation,
};

pub const ARITHMETIC_PRECEDENCE: &str = "SA1407";
pub const CONDITIONAL_PRECEDENCE: &str = "SA1408";

static ARITHMETIC_METADATA: RuleMetadata = RuleMetadata {
    id: ARITHMETIC_PRECEDENCE,
    title: "Arithmetic expressions must declare precedence",
    description: "A C# statement contains a complex arithmetic expression which omits parenthesis \
                  around operators.",
    category: RuleCategory::Maintainability,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1407.html",
};

static CONDITIONAL_METADATA: RuleMetadata = RuleMetadata {
    id: CONDITIONAL_PRECEDENCE,
    title: "Conditional expressions must declare precedence",
    description: "A C# statement contains a complex conditional expression which omits \
                  parenthesis around operators.",
    category: RuleCategory::Maintainability,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1408.html",
};

/// Precedence level of an arithmetic operator
fn arithmetic_level(kind: CsSyntaxKind) -> Option<u8> {
    match kind {
        CsSyntaxKind::Star | CsSyntaxKind::Slash | CsSyntaxKind::Percent => Some(3),
        CsSyntaxKind::Plus | CsSyntaxKind::Minus => Some(2),
        CsSyntaxKind::LtLt | CsSyntaxKind::GtGt => Some(1),
        _ => None,
    }
}

fn conditional_level(kind: CsSyntaxKind) -> Option<u8> {
    match kind {
        CsSyntaxKind::AmpAmp => Some(2),
        CsSyntaxKind::PipePipe => Some(1),
        _ => None,
    }
}

/// Operator token kind of a binary expression
fn operator(node: &CsSyntaxNode) -> Option<CsSyntaxKind> {
    node.children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
        .nth(1)
        .and_then(|element| element.into_token())
        .map(|token| token.kind())
}

/// Binary expression operands of `node`
fn binary_operands(node: &CsSyntaxNode) -> impl Iterator<Item = CsSyntaxNode> {
    node.children()
        .filter(|child| child.kind() == CsSyntaxKind::BinaryExpr)
}

/// Operands that mix precedence levels with their parent
///
/// `level` maps an operator to its level within the rule's operator family.
fn unparenthesized_operands(
    ctx: &TokenContext,
    level: fn(CsSyntaxKind) -> Option<u8>,
) -> Vec<CsSyntaxNode> {
    let mut found = Vec::new();
    for node in ctx
        .root()
        .descendants()
        .filter(|node| node.kind() == CsSyntaxKind::BinaryExpr)
    {
        let Some(parent_level) = operator(&node).and_then(level) else {
            continue;
        };
        for operand in binary_operands(&node) {
            let Some(operand_level) = operator(&operand).and_then(level) else {
                continue;
            };
            if operand_level != parent_level && !edit::contains_missing(&operand) {
                found.push(operand);
            }
        }
    }
    found
}

fn check_precedence(
    ctx: &TokenContext,
    metadata: &RuleMetadata,
    level: fn(CsSyntaxKind) -> Option<u8>,
) -> Vec<Violation> {
    unparenthesized_operands(ctx, level)
        .iter()
        .map(|operand| {
            Violation::new(
                metadata.id,
                metadata.title,
                edit::trimmed_range(operand),
                metadata.default_severity,
            )
        })
        .collect()
}

/// Shared parenthesization fix
pub struct AddParenthesis {
    rule_id: &'static str,
}

impl Fixer for AddParenthesis {
    fn capability(&self) -> FixCapability {
        FixCapability::SINGLE
    }

    fn title(&self) -> &'static str {
        "Add parenthesis"
    }

    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix> {
        let node = edit::find_node_at(ctx.root(), violation.range, CsSyntaxKind::BinaryExpr)?;
        if edit::contains_missing(&node) {
            tracing::debug!("Not parenthesizing incomplete expression at {:?}", violation.range);
            return None;
        }
        let root = edit::replace_node(&node, edit::parenthesize(&node));
        Some(Fix::new(self.rule_id, self.title(), root, violation.range))
    }
}

static ARITHMETIC_FIX: AddParenthesis = AddParenthesis {
    rule_id: ARITHMETIC_PRECEDENCE,
};

static CONDITIONAL_FIX: AddParenthesis = AddParenthesis {
    rule_id: CONDITIONAL_PRECEDENCE,
};

/// Rule SA1407
pub struct ArithmeticPrecedence;

impl Rule for ArithmeticPrecedence {
    fn metadata(&self) -> &RuleMetadata {
        &ARITHMETIC_METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        check_precedence(ctx, &ARITHMETIC_METADATA, arithmetic_level)
    }

    fn fixer(&self) -> Option<&dyn Fixer> {
        Some(&ARITHMETIC_FIX)
    }
}

/// Rule SA1408
pub struct ConditionalPrecedence;

impl Rule for ConditionalPrecedence {
    fn metadata(&self) -> &RuleMetadata {
        &CONDITIONAL_METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        check_precedence(ctx, &CONDITIONAL_METADATA, conditional_level)
    }

    fn fixer(&self) -> Option<&dyn Fixer> {
        Some(&CONDITIONAL_FIX)
    }
}
