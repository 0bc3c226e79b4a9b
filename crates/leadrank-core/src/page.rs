//! Fixed-size paging for the lead table.

/// Rows per page in the lead table.
pub const PAGE_SIZE: usize = 50;

/// One page of a larger slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'s, T> {
    pub items: &'s [T],
    /// 1-based; 0 only when there are no pages.
    pub number: usize,
    pub total_pages: usize,
    /// Index of the first item on this page.
    pub offset: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// `Showing 51-100 of 1,234 leads`, or `No leads` when empty.
    pub fn caption(&self) -> String {
        if self.items.is_empty() {
            return "No leads".to_string();
        }
        format!(
            "Showing {}-{} of {} leads",
            self.offset + 1,
            self.offset + self.items.len(),
            thousands(self.total_items as u64)
        )
    }
}

/// Page `number` (1-based) of `items`. Out-of-range page numbers are clamped.
pub fn paginate<T>(items: &[T], number: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    if total_pages == 0 {
        return Page {
            items,
            number: 0,
            total_pages: 0,
            offset: 0,
            total_items: 0,
        };
    }
    let number = number.clamp(1, total_pages);
    let offset = (number - 1) * per_page;
    let end = (offset + per_page).min(items.len());
    Page {
        items: &items[offset..end],
        number,
        total_pages,
        offset,
        total_items: items.len(),
    }
}

/// Format an integer with comma thousands separators.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
