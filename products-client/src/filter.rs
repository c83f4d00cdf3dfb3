use rayon::prelude::*;

/// Keep the rows where **any** of `fields` contains `needle`, ignoring case.
///
/// The needle is matched as typed, spaces included. An empty needle keeps
/// everything. Order is preserved.
#[tracing::instrument(skip(data, get_field_value), fields(row_count = data.len()))]
pub fn filter_dynamic<'a, T, F>(
    data: &'a [T],
    needle: &str,
    fields: &[&str],
    get_field_value: F,
) -> Vec<&'a T>
where
    T: Sync,
    F: Fn(&T, &str) -> Option<String> + Sync,
{
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return data.iter().collect();
    }

    data.par_iter()
        .filter(|item| {
            fields.iter().any(|field| {
                get_field_value(item, field)
                    .is_some_and(|val| val.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(row: &(&str, u32), field: &str) -> Option<String> {
        (field == "name").then(|| row.0.to_string())
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let rows = [("Pen", 1), ("Book", 2), ("Open Notebook", 3)];
        let kept = filter_dynamic(&rows, "PE", &["name"], name_of);
        assert_eq!(kept, vec![&("Pen", 1), &("Open Notebook", 3)]);
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let rows = [("Pen", 1), ("Book", 2)];
        assert_eq!(filter_dynamic(&rows, "", &["name"], name_of).len(), 2);
    }

    #[test]
    fn test_whitespace_is_part_of_the_needle() {
        let rows = [("Pen", 1), ("Red Book", 2)];
        assert!(filter_dynamic(&rows, "Pen ", &["name"], name_of).is_empty());
        assert!(filter_dynamic(&rows, "  pen", &["name"], name_of).is_empty());
        assert_eq!(filter_dynamic(&rows, " ", &["name"], name_of), vec![&("Red Book", 2)]);
        assert_eq!(filter_dynamic(&rows, "d b", &["name"], name_of), vec![&("Red Book", 2)]);
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let rows = [("Pen", 1)];
        assert!(filter_dynamic(&rows, "pen", &["price"], name_of).is_empty());
    }
}
