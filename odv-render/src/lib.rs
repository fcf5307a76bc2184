use std::io;

use thiserror::Error;

use odv_edt::grid::{Cell, Grid, Owner};

pub mod html;
pub mod text;
pub mod xlsx;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unable to render template: {0}")]
  Template(#[from] sailfish::RenderError),
  #[error("unable to build workbook: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),
  #[error("unable to write delimited text: {0}")]
  Csv(#[from] csv::Error),
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Row heading for an owner: the class code, or `Manini L.` for a teacher.
pub fn owner_label(owner: &Owner) -> String {
  match owner {
    Owner::Class(class_code) => class_code.clone(),
    Owner::Teacher(teacher) => teacher.label(),
  }
}

/// Slots holding a lesson on at least one day, the rows of a class book block.
pub fn filled_slots(grid: &Grid) -> Vec<usize> {
  (0..grid.slots())
    .filter(|slot| !grid.slot_row(*slot).into_iter().all(Cell::is_empty))
    .collect()
}

/// `"2G/H SPA"` -> `"2G-H_SPA"`, safe as a file name.
pub fn file_stem(name: &str) -> String {
  name.trim().replace('/', "-").replace(' ', "_")
}
