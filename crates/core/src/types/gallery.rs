//! Gallery list helpers.

/// Remove the entry at `index`, keeping the relative order of the rest.
///
/// An out-of-range index is a no-op and returns `list` unchanged.
///
/// ```
/// use lingofy_core::remove_at;
///
/// assert_eq!(remove_at(vec!['a', 'b', 'c'], 1), vec!['a', 'c']);
/// assert_eq!(remove_at(vec!['a', 'b', 'c'], 3), vec!['a', 'b', 'c']);
/// ```
#[must_use]
pub fn remove_at<T>(mut list: Vec<T>, index: usize) -> Vec<T> {
    if index < list.len() {
        list.remove(index);
    }
    list
}
