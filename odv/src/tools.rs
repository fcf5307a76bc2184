use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use odv_edt::aggregate::{
  class_subjects, class_teachers, room_classes, subject_names, teacher_classes, teacher_subjects,
};
use odv_edt::{Edt, Export};
use odv_render::html::{page_file_name, render_class_page};
use odv_render::text::{
  render_board_csv, render_class_book_csv, render_councils, render_pairs, render_sets,
};
use odv_render::xlsx::{render_board, render_class_book};

/// Writes a whole file, creating missing directories first.
fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> anyhow::Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)
        .with_context(|| format!("Unable to create directory '{}'", parent.display()))?;
    }
  }

  fs::write(path, contents).with_context(|| format!("Unable to write '{}'", path.display()))?;
  info!("Written '{}'", path.display());
  Ok(())
}

fn load(edt: &Edt, input: &Path) -> anyhow::Result<Export> {
  edt
    .load(input)
    .with_context(|| format!("Unable to load '{}'", input.display()))
}

pub fn classes(edt: &Edt, input: &Path, output: &Path) -> anyhow::Result<()> {
  let export = load(edt, input)?;

  let grids = export.class_grids(edt.schedule());
  for grid in &grids {
    let page = render_class_page(grid, edt.schedule())?;
    write_file(&output.join(page_file_name(grid)), page)?;
  }

  info!("{} class pages in '{}'", grids.len(), output.display());
  Ok(())
}

pub fn board(edt: &Edt, input: &Path, output: &Path) -> anyhow::Result<()> {
  let export = load(edt, input)?;

  let grids = export.teacher_grids(edt.schedule());
  write_file(output, render_board(&grids, edt.schedule(), "Orario")?)?;
  write_file(&output.with_extension("csv"), render_board_csv(&grids)?)?;
  Ok(())
}

pub fn class_book(edt: &Edt, input: &Path, output: &Path) -> anyhow::Result<()> {
  let export = load(edt, input)?;

  let grids = export.class_grids(edt.schedule());
  write_file(output, render_class_book(&grids, edt.schedule())?)?;
  write_file(
    &output.with_extension("csv"),
    render_class_book_csv(&grids, edt.schedule())?,
  )?;
  Ok(())
}

pub fn tables(edt: &Edt, input: &Path, output: &Path) -> anyhow::Result<()> {
  let export = load(edt, input)?;
  let lessons = &export.lessons;

  write_file(&output.join("mat_out.txt"), render_pairs(&subject_names(lessons)))?;
  write_file(&output.join("class_out.txt"), render_sets(&class_subjects(lessons)))?;
  write_file(&output.join("prof_out.txt"), render_sets(&teacher_subjects(lessons)))?;
  write_file(
    &output.join("prof_class_out.txt"),
    render_sets(&teacher_classes(lessons)),
  )?;
  write_file(&output.join("room_out.txt"), render_sets(&room_classes(lessons)))?;
  write_file(&output.join("cc_out.txt"), render_councils(&class_teachers(lessons)))?;
  Ok(())
}
