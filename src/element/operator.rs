//! Comparison operators and logical connectives

use serde::{Deserialize, Serialize};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal (eq)
    #[default]
    Equal,
    /// Not equal (ne)
    NotEqual,
    /// Greater than (gt)
    Greater,
    /// Greater than or equal (ge)
    GreaterOrEqual,
    /// Less than (lt)
    Less,
    /// Less than or equal (le)
    LessOrEqual,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::Greater,
        ComparisonOperator::GreaterOrEqual,
        ComparisonOperator::Less,
        ComparisonOperator::LessOrEqual,
    ];

    /// Keyword used in the wire filter grammar
    pub fn wire_token(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "eq",
            ComparisonOperator::NotEqual => "ne",
            ComparisonOperator::Greater => "gt",
            ComparisonOperator::GreaterOrEqual => "ge",
            ComparisonOperator::Less => "lt",
            ComparisonOperator::LessOrEqual => "le",
        }
    }

    /// Human-readable symbol
    pub fn display_token(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.wire_token() == token)
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalConnective {
    And,
    Or,
    Not,
}

impl LogicalConnective {
    pub fn wire_token(self) -> &'static str {
        match self {
            LogicalConnective::And => "and",
            LogicalConnective::Or => "or",
            LogicalConnective::Not => "not",
        }
    }

    pub fn display_token(self) -> &'static str {
        match self {
            LogicalConnective::And => "AND",
            LogicalConnective::Or => "OR",
            LogicalConnective::Not => "NOT",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        match token {
            "and" => Some(LogicalConnective::And),
            "or" => Some(LogicalConnective::Or),
            "not" => Some(LogicalConnective::Not),
            _ => None,
        }
    }

    /// Whether this connective joins two operands (and/or)
    #[inline]
    pub fn is_binary(self) -> bool {
        !matches!(self, LogicalConnective::Not)
    }
}
