use crate::error::{EvalError, ReduceError};
use super::tree::{NodeType, NodeValue, ParseTree};

/// Сворачивает дерево разбора оператора в синтаксическое дерево.
///
/// Результат содержит только узлы `assignment`, `operator`, `identifier` и
/// `number`; скобки, `;` и нетерминалы отбрасываются.
pub fn reduce(tree: &ParseTree) -> Result<ParseTree, ReduceError> {
    if tree.node_type() != NodeType::Statement {
        return Err(ReduceError::NotAStatement {
            node_type: tree.node_type(),
        });
    }

    let identifier = find_child(tree, NodeType::Identifier, "missing identifier")?;
    let expression = find_child(tree, NodeType::Expression, "missing expression")?;

    Ok(ParseTree::new(
        NodeType::Assignment,
        Some("=".into()),
        vec![reduce_leaf(identifier), reduce_expression(expression)?],
    ))
}

fn find_child<'a>(
    tree: &'a ParseTree,
    node_type: NodeType,
    reason: &'static str,
) -> Result<&'a ParseTree, ReduceError> {
    tree.children()
        .iter()
        .find(|child| child.node_type() == node_type)
        .ok_or(ReduceError::Malformed {
            node_type: tree.node_type(),
            reason,
        })
}

fn reduce_expression(node: &ParseTree) -> Result<ParseTree, ReduceError> {
    match node.node_type() {
        NodeType::Expression | NodeType::Term => fold_chain(node),
        NodeType::Factor => reduce_factor(node),
        NodeType::Number | NodeType::Identifier => Ok(reduce_leaf(node)),
        node_type => Err(ReduceError::Malformed {
            node_type,
            reason: "not an expression",
        }),
    }
}

/// Операнды на чётных позициях, операторы на нечётных. Каждый оператор
/// применяется к своему шагу свёртки, слева направо: `a + b - c` -> `(a+b)-c`.
fn fold_chain(node: &ParseTree) -> Result<ParseTree, ReduceError> {
    let malformed = |reason| ReduceError::Malformed {
        node_type: node.node_type(),
        reason,
    };

    let mut children = node.children().iter();
    let first = children.next().ok_or(malformed("empty operand chain"))?;
    let mut folded = reduce_expression(first)?;

    while let Some(op) = children.next() {
        if op.node_type() != NodeType::Operator {
            return Err(malformed("expected operator between operands"));
        }
        let rhs = children
            .next()
            .ok_or(malformed("operator without right operand"))?;
        folded = ParseTree::new(
            NodeType::Operator,
            op.value().cloned(),
            vec![folded, reduce_expression(rhs)?],
        );
    }

    Ok(folded)
}

fn reduce_factor(node: &ParseTree) -> Result<ParseTree, ReduceError> {
    match node.children() {
        [leaf] if matches!(leaf.node_type(), NodeType::Number | NodeType::Identifier) => {
            Ok(reduce_leaf(leaf))
        }
        [open, inner, close]
            if open.node_type() == NodeType::Parenthesis
                && close.node_type() == NodeType::Parenthesis =>
        {
            reduce_expression(inner)
        }
        _ => Err(ReduceError::Malformed {
            node_type: NodeType::Factor,
            reason: "expected a number, an identifier or a parenthesized expression",
        }),
    }
}

fn reduce_leaf(node: &ParseTree) -> ParseTree {
    ParseTree::new(node.node_type(), node.value().cloned(), Vec::new())
}

/// Вычисляет выражение синтаксического дерева. Для `assignment` - значение
/// правой части.
pub fn evaluate(
    tree: &ParseTree,
    lookup: &dyn Fn(&str) -> Option<f64>,
) -> Result<f64, EvalError> {
    match (tree.node_type(), tree.children()) {
        (NodeType::Assignment, [_, value]) => evaluate(value, lookup),
        (NodeType::Operator, [lhs, rhs]) => {
            let lhs = evaluate(lhs, lookup)?;
            let rhs = evaluate(rhs, lookup)?;
            match tree.value() {
                Some(NodeValue::Str(op)) if op == "+" => Ok(lhs + rhs),
                Some(NodeValue::Str(op)) if op == "-" => Ok(lhs - rhs),
                Some(NodeValue::Str(op)) if op == "*" => Ok(lhs * rhs),
                Some(NodeValue::Str(op)) if op == "/" => {
                    if rhs == 0.0 {
                        Err(EvalError::DivisionByZero)
                    } else {
                        Ok(lhs / rhs)
                    }
                }
                _ => Err(EvalError::NotEvaluable {
                    node_type: NodeType::Operator,
                }),
            }
        }
        (NodeType::Number, []) => match tree.value() {
            Some(NodeValue::Int(n)) => Ok(*n as f64),
            Some(NodeValue::Float(x)) => Ok(*x),
            Some(NodeValue::Str(literal)) => literal
                .parse()
                .map_err(|_| EvalError::BadNumber {
                    literal: literal.clone(),
                }),
            None => Err(EvalError::NotEvaluable {
                node_type: NodeType::Number,
            }),
        },
        (NodeType::Identifier, []) => {
            let name = tree.value().map(ToString::to_string).unwrap_or_default();
            lookup(&name).ok_or(EvalError::Unbound { name })
        }
        (node_type, _) => Err(EvalError::NotEvaluable { node_type }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::lex;
    use crate::parser::Parser;

    fn syntax_tree(source: &str) -> ParseTree {
        let output = lex(source);
        let parse_tree = Parser::new(&output).unwrap().parse().unwrap();
        reduce(&parse_tree).unwrap()
    }

    fn no_vars(_: &str) -> Option<f64> {
        None
    }

    /// Префиксная запись дерева, например `(= x (+ 1 2))`
    fn sexpr(tree: &ParseTree) -> String {
        let value = tree.value().map(ToString::to_string).unwrap_or_default();
        if tree.children().is_empty() {
            return value;
        }
        let children: Vec<String> = tree.children().iter().map(sexpr).collect();
        format!("({} {})", value, children.join(" "))
    }

    #[test]
    fn grouping_and_precedence() {
        let tree = syntax_tree("x = (3 + 5) * 2 ;");
        assert_eq!(tree.node_type(), NodeType::Assignment);
        let rhs = &tree.children()[1];
        assert_eq!(rhs.label(), "operator: *");
        assert_eq!(rhs.children()[0].label(), "operator: +");
        assert_eq!(rhs.children()[0].children()[0].label(), "number: 3");
        assert_eq!(rhs.children()[0].children()[1].label(), "number: 5");
        assert_eq!(rhs.children()[1].label(), "number: 2");
    }

    #[test]
    fn subtraction_is_left_associative() {
        let tree = syntax_tree("x = 10 - 3 - 2 ;");
        assert_eq!(sexpr(&tree), "(= x (- (- 10 3) 2))");
        assert_eq!(evaluate(&tree, &no_vars), Ok(5.0));
    }

    #[test]
    fn mixed_operators_fold_individually() {
        assert_eq!(sexpr(&syntax_tree("x = a + b - c;")), "(= x (- (+ a b) c))");
        assert_eq!(sexpr(&syntax_tree("x = 8 / 4 * 2;")), "(= x (* (/ 8 4) 2))");
        assert_eq!(evaluate(&syntax_tree("x = 8 / 4 * 2;"), &no_vars), Ok(4.0));
        assert_eq!(
            sexpr(&syntax_tree("x = 1 + 2 * 3 - 4;")),
            "(= x (- (+ 1 (* 2 3)) 4))"
        );
    }

    #[test]
    fn only_semantic_node_types_survive() {
        fn walk(tree: &ParseTree) {
            assert!(matches!(
                tree.node_type(),
                NodeType::Assignment | NodeType::Operator | NodeType::Identifier | NodeType::Number
            ));
            tree.children().iter().for_each(walk);
        }
        walk(&syntax_tree("total = ((a) * (b + 2.5)) / c;"));
    }

    #[test]
    fn rejects_non_statement_root() {
        let leaf = ParseTree::leaf(NodeType::Number, "1");
        assert_eq!(
            reduce(&leaf),
            Err(ReduceError::NotAStatement {
                node_type: NodeType::Number
            })
        );
    }

    #[test]
    fn rejects_malformed_factor() {
        let statement = ParseTree::nonterminal(
            NodeType::Statement,
            vec![
                ParseTree::leaf(NodeType::Identifier, "x"),
                ParseTree::leaf(NodeType::Assignment, "="),
                ParseTree::nonterminal(
                    NodeType::Expression,
                    vec![ParseTree::nonterminal(
                        NodeType::Factor,
                        vec![ParseTree::leaf(NodeType::Operator, "+")],
                    )],
                ),
                ParseTree::leaf(NodeType::StatementTerminator, ";"),
            ],
        );
        assert!(matches!(
            reduce(&statement),
            Err(ReduceError::Malformed {
                node_type: NodeType::Factor,
                ..
            })
        ));
    }

    #[test]
    fn evaluate_with_bindings() {
        let tree = syntax_tree("y = x * 2 + z;");
        let lookup = |name: &str| match name {
            "x" => Some(4.0),
            "z" => Some(0.5),
            _ => None,
        };
        assert_eq!(evaluate(&tree, &lookup), Ok(8.5));
        assert_eq!(
            evaluate(&syntax_tree("y = q;"), &lookup),
            Err(EvalError::Unbound { name: "q".into() })
        );
        assert_eq!(
            evaluate(&syntax_tree("y = 1 / (2 - 2);"), &lookup),
            Err(EvalError::DivisionByZero)
        );
    }
}
