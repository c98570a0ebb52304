use std::fmt;
use std::str::FromStr;

use crate::error::ConstructionError;
use crate::parser::token::{Token, TokenKind};

/// Типы узлов дерева разбора: четыре нетерминала грамматики и шесть
/// категорий терминалов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Statement,
    Expression,
    Term,
    Factor,

    Identifier,
    Number,
    Operator,
    Assignment,
    Parenthesis,
    StatementTerminator,
}

impl NodeType {
    pub const ALL: [NodeType; 10] = [
        NodeType::Statement,
        NodeType::Expression,
        NodeType::Term,
        NodeType::Factor,
        NodeType::Identifier,
        NodeType::Number,
        NodeType::Operator,
        NodeType::Assignment,
        NodeType::Parenthesis,
        NodeType::StatementTerminator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeType::Statement => "<statement>",
            NodeType::Expression => "<expression>",
            NodeType::Term => "<term>",
            NodeType::Factor => "<factor>",
            NodeType::Identifier => "identifier",
            NodeType::Number => "number",
            NodeType::Operator => "operator",
            NodeType::Assignment => "assignment",
            NodeType::Parenthesis => "parenthesis",
            NodeType::StatementTerminator => "statement_terminator",
        }
    }

    pub fn is_nonterminal(self) -> bool {
        matches!(
            self,
            NodeType::Statement | NodeType::Expression | NodeType::Term | NodeType::Factor
        )
    }

    /// Терминальный тип узла для вида токена
    pub fn terminal(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Identifier => NodeType::Identifier,
            TokenKind::Number => NodeType::Number,
            TokenKind::Operator => NodeType::Operator,
            TokenKind::Assignment => NodeType::Assignment,
            TokenKind::Parenthesis => NodeType::Parenthesis,
            TokenKind::StatementTerminator => NodeType::StatementTerminator,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeType {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|node_type| node_type.name() == s)
            .ok_or_else(|| ConstructionError::UnknownNodeType { name: s.to_string() })
    }
}

/// Скалярное значение узла
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Str(s) => f.write_str(s),
            NodeValue::Int(n) => write!(f, "{}", n),
            NodeValue::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::Str(s.to_string())
    }
}

impl From<i64> for NodeValue {
    fn from(n: i64) -> Self {
        NodeValue::Int(n)
    }
}

impl From<f64> for NodeValue {
    fn from(x: f64) -> Self {
        NodeValue::Float(x)
    }
}

/// Узел дерева разбора (и синтаксического дерева после свёртки).
///
/// Дети принадлежат узлу, ссылок на родителя нет. После построения не
/// изменяется.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    node_type: NodeType,
    value: Option<NodeValue>,
    children: Vec<ParseTree>,
}

impl ParseTree {
    pub fn new(node_type: NodeType, value: Option<NodeValue>, children: Vec<ParseTree>) -> Self {
        Self {
            node_type,
            value,
            children,
        }
    }

    pub fn nonterminal(node_type: NodeType, children: Vec<ParseTree>) -> Self {
        Self::new(node_type, None, children)
    }

    pub fn leaf(node_type: NodeType, value: impl Into<NodeValue>) -> Self {
        Self::new(node_type, Some(value.into()), Vec::new())
    }

    /// Терминальный узел из токена, значение - лексема
    pub fn from_token(token: &Token) -> Self {
        Self::leaf(NodeType::terminal(token.kind()), token.lexeme())
    }

    /// Конструктор по текстовой метке типа, проверка сразу при создании
    pub fn from_raw(
        label: &str,
        value: Option<NodeValue>,
        children: Vec<ParseTree>,
    ) -> Result<Self, ConstructionError> {
        let node_type = label.parse()?;
        Ok(Self::new(node_type, value, children))
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn value(&self) -> Option<&NodeValue> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[ParseTree] {
        &self.children
    }

    /// `type: value` или просто `type`
    pub fn label(&self) -> String {
        match &self.value {
            Some(value) => format!("{}: {}", self.node_type, value),
            None => self.node_type.to_string(),
        }
    }

    /// Листья слева направо
    pub fn leaves(&self) -> Vec<&ParseTree> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ParseTree>) {
        if self.children.is_empty() {
            out.push(self);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    fn write_children(&self, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let (connector, extension) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            writeln!(f, "{}{}{}", prefix, connector, child.label())?;
            child.write_children(f, &format!("{}{}", prefix, extension))?;
        }
        Ok(())
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label())?;
        self.write_children(f, "")
    }
}
