/// Requested slice of a listing, 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u32,
  pub page_size: u32,
}

impl PageRequest {
  pub fn new(page: u32, page_size: u32) -> Self {
    Self {
      page: page.max(1),
      page_size: page_size.max(1),
    }
  }

  pub fn first(page_size: u32) -> Self {
    Self::new(1, page_size)
  }

  /// Number of rows to skip
  pub fn offset(&self) -> i64 {
    (i64::from(self.page) - 1) * i64::from(self.page_size)
  }

  pub fn limit(&self) -> i64 {
    i64::from(self.page_size)
  }
}

/// One page of results together with the total row count
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: i64,
  pub request: PageRequest,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
    Self {
      items,
      total,
      request,
    }
  }

  /// Cuts a page out of an already materialized, ordered collection
  pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
    let total = all.len() as i64;
    let items = all
      .into_iter()
      .skip(request.offset() as usize)
      .take(request.page_size as usize)
      .collect();

    Self::new(items, total, request)
  }

  pub fn page_count(&self) -> i64 {
    let size = i64::from(self.request.page_size);
    // An empty listing still has one (empty) page
    ((self.total + size - 1) / size).max(1)
  }

  pub fn has_next(&self) -> bool {
    i64::from(self.request.page) < self.page_count()
  }

  pub fn has_previous(&self) -> bool {
    self.request.page > 1
  }

  /// True when the requested page lies past the last page
  pub fn is_out_of_range(&self) -> bool {
    i64::from(self.request.page) > self.page_count()
  }

  pub fn map<U, F>(self, f: F) -> Page<U>
  where
    F: FnMut(T) -> U,
  {
    Page {
      items: self.items.into_iter().map(f).collect(),
      total: self.total,
      request: self.request,
    }
  }
}
