use std::fmt;

/// One page of a paginated result slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] { self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Splits a slice into fixed size pages; the last page may be shorter.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    /// A page size of zero is treated as one.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        let pages = items
            .chunks(page_size.max(1))
            .map(|items| Page { items })
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize { self.pages.len() }
    pub fn is_empty(&self) -> bool { self.pages.is_empty() }
    pub fn get(&self, page: usize) -> Option<&Page<'a, T>> { self.pages.get(page) }
    pub fn iter(&self) -> std::slice::Iter<'_, Page<'a, T>> { self.pages.iter() }
}

impl<'p, 'a, T> IntoIterator for &'p Paginator<'a, T> {
    type Item = &'p Page<'a, T>;
    type IntoIter = std::slice::Iter<'p, Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}
