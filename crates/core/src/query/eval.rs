// In-memory query evaluator, used by the local document store.

use std::cmp::Ordering;

use crate::document::{DocumentValue, RawDocument, StoredDocument};
use crate::query::ast::{Direction, Filter, FilterOp, Order, Query};

/// Compare two values of comparable kinds. Integers and floats compare
/// numerically; any other cross-kind pair is incomparable.
pub fn compare_values(left: &DocumentValue, right: &DocumentValue) -> Option<Ordering> {
    use DocumentValue::*;

    match (left, right) {
        (String(a), String(b)) => Some(a.cmp(b)),
        (Integer(a), Integer(b)) => Some(a.cmp(b)),
        (Float(a), Float(b)) => a.partial_cmp(b),
        (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
        (Float(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
        (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
        (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
        (a, b) if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

fn kind_rank(value: &DocumentValue) -> u8 {
    match value {
        DocumentValue::Null => 0,
        DocumentValue::Boolean(_) => 1,
        DocumentValue::Integer(_) | DocumentValue::Float(_) => 2,
        DocumentValue::Timestamp(_) => 3,
        DocumentValue::String(_) => 4,
        DocumentValue::Array(_) => 5,
        DocumentValue::Map(_) => 6,
    }
}

/// Numbers order by value, then floats before integers of equal value,
/// then integers exactly.
fn compare_numbers(left: &DocumentValue, right: &DocumentValue) -> Ordering {
    fn key(value: &DocumentValue) -> (f64, u8, i64) {
        match value {
            DocumentValue::Integer(n) => (*n as f64, 1, *n),
            DocumentValue::Float(n) => (*n, 0, 0),
            _ => (0.0, 0, 0),
        }
    }
    let (a, a_tag, a_exact) = key(left);
    let (b, b_tag, b_exact) = key(right);
    a.total_cmp(&b)
        .then(a_tag.cmp(&b_tag))
        .then(a_exact.cmp(&b_exact))
}

/// Total order over all values, used for sorting.
///
/// Kinds rank null < boolean < number < timestamp < string < array < map;
/// values of the same kind compare by content.
pub fn sort_values(left: &DocumentValue, right: &DocumentValue) -> Ordering {
    use DocumentValue::*;

    match (left, right) {
        (String(a), String(b)) => a.cmp(b),
        (Boolean(a), Boolean(b)) => a.cmp(b),
        (Timestamp(a), Timestamp(b)) => a.cmp(b),
        (Integer(_) | Float(_), Integer(_) | Float(_)) => compare_numbers(left, right),
        (Array(a), Array(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| sort_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Map(a), Map(b)) => a
            .iter()
            .zip(b)
            .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| sort_values(va, vb)))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => kind_rank(left).cmp(&kind_rank(right)),
    }
}

/// Evaluate one filter. A missing field never matches.
///
/// Null fields read as absent, so a filter against null matches nothing.
pub fn eval_filter(filter: &Filter, doc: &RawDocument) -> bool {
    let Some(value) = doc.get(&filter.field) else {
        return false;
    };
    let ordering = compare_values(value, &filter.value);
    match filter.op {
        FilterOp::Eq => ordering == Some(Ordering::Equal),
        FilterOp::Neq => ordering != Some(Ordering::Equal),
        FilterOp::Lt => ordering == Some(Ordering::Less),
        FilterOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        FilterOp::Gt => ordering == Some(Ordering::Greater),
        FilterOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
    }
}

/// Whether a document satisfies every filter of `query`.
pub fn matches(query: &Query, doc: &RawDocument) -> bool {
    query.filters.iter().all(|f| eval_filter(f, doc))
}

fn compare_by(order: &[Order], a: &RawDocument, b: &RawDocument) -> Ordering {
    for clause in order {
        let ordering = match (a.get(&clause.field), b.get(&clause.field)) {
            (Some(x), Some(y)) => {
                let ord = sort_values(x, y);
                match clause.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
            // Documents without the sort field go last in either direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Run `query` over `docs`: collection scope, filters, stable ordering,
/// then limit.
pub fn apply<I>(query: &Query, docs: I) -> Vec<StoredDocument>
where
    I: IntoIterator<Item = StoredDocument>,
{
    let mut selected: Vec<StoredDocument> = docs
        .into_iter()
        .filter(|doc| doc.identity.collection() == query.collection)
        .filter(|doc| matches(query, &doc.data))
        .collect();

    if !query.order.is_empty() {
        selected.sort_by(|a, b| compare_by(&query.order, &a.data, &b.data));
    }
    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }
    selected
}
