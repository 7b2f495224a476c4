//! Conversion between linear conditions and condition trees

use crate::condition::{Condition, FilterElement};
use crate::element::LogicalConnective;
use crate::error::{FilterError, Result};
use crate::tree::{Group, Node};

/// Decode a linear condition into a tree
///
/// Operands joined by one connective become siblings of a single group, so
/// `A and B and C` is one three-child `and` group. Where `and` and `or` mix
/// at one level without parentheses, `and` binds tighter, as it does in the
/// wire grammar. A parenthesized sub-condition becomes its own subtree, and
/// keeps a parenthesis mark whenever [`to_condition`] would otherwise drop
/// the parentheses. Returns `None` for an empty condition.
pub fn to_tree(condition: &Condition) -> Result<Option<Node>> {
    if condition.is_empty() {
        return Ok(None);
    }
    let mut root = build_level(condition.elements())?;
    settle(&mut root, None);
    Ok(Some(root))
}

fn build_level(elements: &[FilterElement]) -> Result<Node> {
    // operands of each `or` term; every term is an `and` chain
    let mut terms: Vec<Vec<Node>> = vec![Vec::new()];
    let mut pos = 0;

    loop {
        let (operand, next) = read_operand(elements, pos)?;
        if let Some(term) = terms.last_mut() {
            term.push(operand);
        }
        pos = next;

        match elements.get(pos) {
            None => break,
            Some(FilterElement::Connective(LogicalConnective::And)) => {}
            Some(FilterElement::Connective(LogicalConnective::Or)) => terms.push(Vec::new()),
            Some(_) => {
                return Err(FilterError::InvalidState(format!(
                    "expected 'and' or 'or' at position {}",
                    pos
                )))
            }
        }
        pos += 1;
    }

    let ors = terms
        .into_iter()
        .map(|term| join(LogicalConnective::And, term))
        .collect();
    Ok(join(LogicalConnective::Or, ors))
}

fn read_operand(elements: &[FilterElement], pos: usize) -> Result<(Node, usize)> {
    match elements.get(pos) {
        Some(FilterElement::Comparison(c)) => Ok((Node::Leaf(c.clone()), pos + 1)),
        Some(FilterElement::Connective(LogicalConnective::Not)) => {
            let (inner, next) = read_operand(elements, pos + 1)?;
            Ok((Node::not(inner), next))
        }
        Some(FilterElement::Group(nested)) => {
            if nested.is_empty() {
                return Err(FilterError::InvalidState(format!(
                    "empty nested condition at position {}",
                    pos
                )));
            }
            log::trace!("to_tree: nested condition at position {}", pos);
            let inner = build_level(nested.elements())?;
            Ok((Node::parenthesized(inner), pos + 1))
        }
        Some(FilterElement::Connective(c)) => Err(FilterError::InvalidState(format!(
            "'{}' at position {} has no left operand",
            c.wire_token(),
            pos
        ))),
        None => Err(FilterError::InvalidState(
            "condition ends without an operand".to_string(),
        )),
    }
}

fn join(connective: LogicalConnective, mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1 {
        if let Some(only) = nodes.pop() {
            return only;
        }
    }
    log::trace!(
        "to_tree: flattening {} operands into one '{}' group",
        nodes.len(),
        connective.wire_token()
    );
    Node::Group(Group {
        connective,
        children: nodes,
        parenthesized: false,
    })
}

/// Drop parenthesis marks that encoding under `parent` adds back anyway
fn settle(node: &mut Node, parent: Option<LogicalConnective>) {
    let Node::Group(group) = node else {
        return;
    };
    let context = operand_context(group);
    for child in &mut group.children {
        settle(child, context);
    }
    if !group.parenthesized {
        return;
    }

    if group.is_wrapper() {
        let implied = group
            .children
            .first()
            .is_some_and(|c| !c.is_parenthesized() && implied_by(c, parent));
        if implied {
            if let Some(child) = group.children.pop() {
                log::trace!("to_tree: unwrapping parentheses implied by position");
                *node = child;
            }
        }
    } else if implies_parentheses(group, parent) {
        group.parenthesized = false;
    }
}

/// Encode a tree as a linear condition
///
/// Children of an `and`/`or` group are joined by its connective. A nested
/// `and`/`or` group is parenthesized unless it is an `and` group under an
/// `or` group, where precedence already keeps it together. The operand of a
/// `not` is parenthesized whenever it is a group. Groups marked as
/// parenthesized are always written in parentheses.
pub fn to_condition(node: &Node) -> Result<Condition> {
    let mut condition = Condition::new();
    append_operand(&mut condition, node, None)?;
    Ok(condition)
}

fn append_operand(out: &mut Condition, node: &Node, parent: Option<LogicalConnective>) -> Result<()> {
    let enclose = node
        .as_group()
        .is_some_and(|g| g.parenthesized || implies_parentheses(g, parent));
    if !enclose {
        return append_content(out, node);
    }

    let mut nested = Condition::new();
    append_content(&mut nested, node)?;
    log::trace!("to_condition: parenthesizing {} elements", nested.len());
    out.append(nested)?;
    Ok(())
}

fn append_content(out: &mut Condition, node: &Node) -> Result<()> {
    match node {
        Node::Leaf(c) => {
            out.append(c.clone())?;
        }
        Node::Group(g) if g.is_not() => {
            out.append(LogicalConnective::Not)?;
            for child in &g.children {
                append_operand(out, child, Some(LogicalConnective::Not))?;
            }
        }
        Node::Group(g) => {
            let context = operand_context(g);
            for (i, child) in g.children.iter().enumerate() {
                if i > 0 {
                    out.append(g.connective)?;
                }
                append_operand(out, child, context)?;
            }
        }
    }
    Ok(())
}

/// Connective an operand of `group` is written under; `None` inside `(...)`
fn operand_context(group: &Group) -> Option<LogicalConnective> {
    if group.is_wrapper() {
        None
    } else {
        Some(group.connective)
    }
}

fn implied_by(node: &Node, parent: Option<LogicalConnective>) -> bool {
    node.as_group().is_some_and(|g| implies_parentheses(g, parent))
}

/// Whether position alone makes `to_condition` parenthesize this group
fn implies_parentheses(group: &Group, parent: Option<LogicalConnective>) -> bool {
    match (parent, group.connective) {
        (None, _) => false,
        (Some(LogicalConnective::Not), _) => true,
        (Some(_), LogicalConnective::Not) => false,
        (Some(parent), LogicalConnective::And) => parent != LogicalConnective::Or,
        (Some(_), LogicalConnective::Or) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Field, FieldKind};
    use crate::element::{Comparison, ComparisonOperator};
    use LogicalConnective::{And, Not, Or};

    fn cmp(name: &str) -> Comparison {
        Comparison::new(Field::new(name, FieldKind::Int32), ComparisonOperator::Equal, 1).unwrap()
    }

    fn leaf(name: &str) -> Node {
        Node::leaf(cmp(name))
    }

    fn and_chain(names: &[&str]) -> Condition {
        let mut c = Condition::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                c.append(And).unwrap();
            }
            c.append(cmp(name)).unwrap();
        }
        c
    }

    #[test]
    fn test_empty_condition_has_no_tree() {
        assert_eq!(to_tree(&Condition::new()).unwrap(), None);
        assert!(to_condition(&Node::and(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_flat_chain_is_one_group() {
        let mut c = Condition::from_element(cmp("A"));
        c.append(And).unwrap().append(cmp("B")).unwrap();
        c.append(And).unwrap().append(cmp("C")).unwrap();

        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(tree, Node::and(vec![leaf("A"), leaf("B"), leaf("C")]));
        assert_eq!(to_condition(&tree).unwrap(), c);
    }

    #[test]
    fn test_leading_not() {
        let mut c = Condition::new();
        c.append(Not).unwrap().append(cmp("A")).unwrap();
        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(tree, Node::not(leaf("A")));
        assert_eq!(to_condition(&tree).unwrap().render_wire(), "not A eq 1");
    }

    #[test]
    fn test_mixed_connectives_follow_precedence() {
        // B and C or not D
        let mut c = Condition::from_element(cmp("B"));
        c.append(And).unwrap().append(cmp("C")).unwrap();
        c.append(Or).unwrap().append(Not).unwrap().append(cmp("D")).unwrap();

        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(
            tree,
            Node::or(vec![Node::and(vec![leaf("B"), leaf("C")]), Node::not(leaf("D"))])
        );
        assert_eq!(to_condition(&tree).unwrap().render_wire(), c.render_wire());

        // B or C and D
        let mut c = Condition::from_element(cmp("B"));
        c.append(Or).unwrap().append(cmp("C")).unwrap();
        c.append(And).unwrap().append(cmp("D")).unwrap();
        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(
            tree,
            Node::or(vec![leaf("B"), Node::and(vec![leaf("C"), leaf("D")])])
        );
        assert_eq!(to_condition(&tree).unwrap(), c);
    }

    #[test]
    fn test_nested_groups_keep_parentheses() {
        let tree = Node::and(vec![
            Node::and(vec![leaf("A"), leaf("B")]),
            Node::or(vec![leaf("C"), leaf("D")]),
            Node::not(Node::and(vec![leaf("E"), leaf("F")])),
        ]);
        let c = to_condition(&tree).unwrap();
        assert_eq!(
            c.render_wire(),
            "(A eq 1 and B eq 1) and (C eq 1 or D eq 1) and not (E eq 1 and F eq 1)"
        );
        assert_eq!(to_tree(&c).unwrap().unwrap(), tree);
    }

    #[test]
    fn test_double_negation_is_parenthesized() {
        let tree = Node::not(Node::not(leaf("A")));
        let c = to_condition(&tree).unwrap();
        assert_eq!(c.render_wire(), "not (not A eq 1)");
        assert_eq!(to_tree(&c).unwrap().unwrap(), tree);
    }

    #[test]
    fn test_explicit_parentheses_survive_round_trip() {
        // (A and B) or C
        let mut c = Condition::from_element(and_chain(&["A", "B"]));
        c.append(Or).unwrap().append(cmp("C")).unwrap();
        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(
            tree,
            Node::or(vec![Node::parenthesized(Node::and(vec![leaf("A"), leaf("B")])), leaf("C")])
        );
        assert_eq!(to_condition(&tree).unwrap().render_wire(), "(A eq 1 and B eq 1) or C eq 1");

        // A and (B)
        let mut c = Condition::from_element(cmp("A"));
        c.append(And).unwrap().append(Condition::from_element(cmp("B"))).unwrap();
        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(tree, Node::and(vec![leaf("A"), Node::parenthesized(leaf("B"))]));
        assert_eq!(to_condition(&tree).unwrap().render_wire(), "A eq 1 and (B eq 1)");

        // not (A)
        let mut c = Condition::new();
        c.append(Not).unwrap().append(Condition::from_element(cmp("A"))).unwrap();
        assert_eq!(to_condition(&to_tree(&c).unwrap().unwrap()).unwrap().render_wire(), "not (A eq 1)");
    }

    #[test]
    fn test_whole_and_doubled_parentheses() {
        let whole = Condition::from_element(and_chain(&["A", "B"]));
        let tree = to_tree(&whole).unwrap().unwrap();
        assert!(tree.is_parenthesized());
        assert_eq!(to_condition(&tree).unwrap(), whole);

        let doubled = Condition::from_element(Condition::from_element(and_chain(&["A", "B"])));
        assert_eq!(doubled.render_wire(), "((A eq 1 and B eq 1))");
        assert_eq!(to_condition(&to_tree(&doubled).unwrap().unwrap()).unwrap(), doubled);

        let single = Condition::from_element(Condition::from_element(cmp("A")));
        assert_eq!(to_tree(&single).unwrap().unwrap(), Node::parenthesized(leaf("A")));
    }

    #[test]
    fn test_implied_parentheses_leave_no_mark() {
        // (A or B) and C: the or group would be parenthesized anyway
        let mut inner = Condition::from_element(cmp("A"));
        inner.append(Or).unwrap().append(cmp("B")).unwrap();
        let mut c = Condition::from_element(inner);
        c.append(And).unwrap().append(cmp("C")).unwrap();

        let tree = to_tree(&c).unwrap().unwrap();
        assert_eq!(tree, Node::and(vec![Node::or(vec![leaf("A"), leaf("B")]), leaf("C")]));
        assert!(!tree.children()[0].is_parenthesized());
    }

    #[test]
    fn test_malformed_sequences_are_rejected() {
        let mut dangling = Condition::from_element(cmp("A"));
        dangling.append(And).unwrap();
        assert!(matches!(to_tree(&dangling), Err(FilterError::InvalidState(_))));

        let mut adjacent = Condition::from_element(cmp("A"));
        adjacent.append(cmp("B")).unwrap();
        assert!(matches!(to_tree(&adjacent), Err(FilterError::InvalidState(_))));

        let leading = Condition::from_element(Or);
        assert!(matches!(to_tree(&leading), Err(FilterError::InvalidState(_))));

        let empty_group = Condition::from_element(Condition::new());
        assert!(matches!(to_tree(&empty_group), Err(FilterError::InvalidState(_))));
    }
}
