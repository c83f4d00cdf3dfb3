use std::cmp::Ordering;

/// Value a column sorts by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Less,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Greater,
        }
    }
}

/// Stable sort: rows with equal values keep their incoming order in both
/// directions.
pub fn sort_dynamic<T, F>(data: &mut [T], descending: bool, get_value: F)
where
    F: for<'r> Fn(&'r T) -> SortValue<'r>,
{
    data.sort_by(|a, b| {
        let (a_val, b_val) = (get_value(a), get_value(b));
        if descending {
            b_val.compare(&a_val)
        } else {
            a_val.compare(&b_val)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_sort_numerically() {
        let mut rows = vec![10.0, 9.5, 100.0, 2.0];
        sort_dynamic(&mut rows, false, |v| SortValue::Number(*v));
        assert_eq!(rows, vec![2.0, 9.5, 10.0, 100.0]);
    }

    #[test]
    fn test_text_is_plain_lexicographic() {
        let mut rows = vec!["pen", "Book", "apple"];
        sort_dynamic(&mut rows, false, |v| SortValue::Text(v));
        assert_eq!(rows, vec!["Book", "apple", "pen"]);
    }

    #[test]
    fn test_descending_keeps_ties_in_original_order() {
        let mut rows = vec![(1, "a"), (2, "b"), (1, "c"), (2, "d")];
        sort_dynamic(&mut rows, true, |v| SortValue::Number(v.0 as f64));
        assert_eq!(rows, vec![(2, "b"), (2, "d"), (1, "a"), (1, "c")]);
    }
}
